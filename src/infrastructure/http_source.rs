// HTTP snapshot source implementation
use crate::application::errors::FetchError;
use crate::application::snapshot_source::SnapshotSource;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSnapshotSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_csv(&self) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("Fetching snapshot from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "text/csv")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), self.url);
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
