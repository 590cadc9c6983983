// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_snapshot;
pub mod file_source;
pub mod http_source;
