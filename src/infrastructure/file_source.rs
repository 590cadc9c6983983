// Local file snapshot source implementation
use crate::application::errors::FetchError;
use crate::application::snapshot_source::SnapshotSource;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_csv(&self) -> Result<Vec<u8>, FetchError> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
