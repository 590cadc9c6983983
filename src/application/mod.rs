// Application layer - Ports and use cases
pub mod errors;
pub mod metrics_service;
pub mod snapshot_source;
