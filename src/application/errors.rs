// Load-boundary errors
use std::time::Duration;

/// The snapshot could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to snapshot source failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("snapshot source answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// The snapshot was retrieved but is not a valid metrics CSV.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("snapshot has no header row")]
    MissingHeader,

    #[error("unexpected header: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("malformed row: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row} is dated before the row preceding it")]
    OutOfOrder { row: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
