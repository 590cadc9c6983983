// Domain layer - Snapshot model and pure transformations
pub mod dataset;
pub mod record;
pub mod sample;
pub mod series;
pub mod summary;
pub mod ticks;
pub mod window;
