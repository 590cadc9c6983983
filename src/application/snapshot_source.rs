// Snapshot source trait for retrieving the raw metrics CSV
use crate::application::errors::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the complete CSV snapshot as raw bytes
    async fn fetch_csv(&self) -> Result<Vec<u8>, FetchError>;

    /// Where the snapshot comes from, for logs
    fn describe(&self) -> String;
}
