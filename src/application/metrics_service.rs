// Metrics service - Use cases over the loaded snapshot
use crate::application::errors::{FetchError, LoadError};
use crate::application::snapshot_source::SnapshotSource;
use crate::domain::dataset::{Dataset, DatasetStatus};
use crate::domain::record::RawRecord;
use crate::domain::sample::{compute_samples, Sample};
use crate::domain::series::{Series, SeriesKind};
use crate::domain::summary::Summary;
use crate::infrastructure::csv_snapshot::{parse_records, write_records};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MetricsService {
    source: Arc<dyn SnapshotSource>,
    dataset: Arc<RwLock<Dataset>>,
    fetch_timeout: Duration,
    noon_hour: u32,
}

impl MetricsService {
    pub fn new(source: Arc<dyn SnapshotSource>, fetch_timeout: Duration, noon_hour: u32) -> Self {
        Self {
            source,
            dataset: Arc::new(RwLock::new(Dataset::new())),
            fetch_timeout,
            noon_hour,
        }
    }

    /// Fetch and rebuild the whole dataset.
    ///
    /// A failed load leaves the dataset empty. A load overtaken by `clear`
    /// or a newer `reload` is discarded.
    pub async fn reload(&self) -> DatasetStatus {
        let ticket = self.dataset.write().await.begin_load();
        let start_time = Instant::now();

        let result = self.load_samples().await;

        let mut dataset = self.dataset.write().await;
        match result {
            Ok(samples) => {
                let count = samples.len();
                if dataset.complete_load(ticket, samples) {
                    tracing::info!(
                        samples = count,
                        elapsed_ms = start_time.elapsed().as_millis() as u64,
                        "Loaded snapshot from {}",
                        self.source.describe()
                    );
                } else {
                    tracing::debug!("Discarding superseded snapshot load");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load snapshot from {}", self.source.describe());
                if !dataset.fail_load(ticket) {
                    tracing::debug!("Ignoring failure of superseded snapshot load");
                }
            }
        }
        dataset.status()
    }

    pub async fn clear(&self) -> DatasetStatus {
        let mut dataset = self.dataset.write().await;
        dataset.clear();
        tracing::info!("Cleared snapshot");
        dataset.status()
    }

    pub async fn status(&self) -> DatasetStatus {
        self.dataset.read().await.status()
    }

    pub async fn series(&self, kind: SeriesKind) -> Series {
        Series::build(kind, self.dataset.read().await.samples())
    }

    pub async fn summary(&self) -> Summary {
        Summary::from_samples(self.dataset.read().await.samples(), self.noon_hour)
    }

    /// The loaded records serialized back to snapshot CSV.
    pub async fn export_csv(&self) -> anyhow::Result<Vec<u8>> {
        let records: Vec<RawRecord> = self
            .dataset
            .read()
            .await
            .samples()
            .iter()
            .map(|sample| sample.record.clone())
            .collect();
        write_records(&records)
    }

    async fn load_samples(&self) -> Result<Vec<Sample>, LoadError> {
        let bytes = tokio::time::timeout(self.fetch_timeout, self.source.fetch_csv())
            .await
            .map_err(|_| FetchError::Timeout(self.fetch_timeout))??;
        let records = parse_records(&bytes)?;
        Ok(compute_samples(&records))
    }
}
