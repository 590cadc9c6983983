use crate::application::snapshot_source::SnapshotSource;
use crate::domain::ticks::DEFAULT_TICK_COUNT;
use crate::infrastructure::file_source::FileSnapshotSource;
use crate::infrastructure::http_source::HttpSnapshotSource;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub source: SourceSettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub url: Option<String>,
    pub path: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the configured source; a URL takes precedence over a path.
    pub fn build(&self) -> anyhow::Result<Arc<dyn SnapshotSource>> {
        match (&self.url, &self.path) {
            (Some(url), _) => Ok(Arc::new(HttpSnapshotSource::new(url.clone()))),
            (None, Some(path)) => Ok(Arc::new(FileSnapshotSource::new(path))),
            (None, None) => anyhow::bail!("either source.url or source.path must be configured"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SamplingSettings {
    /// UTC hour of the sampling slot the dashboard labels as "noon".
    #[serde(default = "default_noon_hour")]
    pub noon_hour: u32,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            noon_hour: default_noon_hour(),
            tick_count: default_tick_count(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_noon_hour() -> u32 {
    12
}

fn default_tick_count() -> usize {
    DEFAULT_TICK_COUNT
}

/// Load `config/metrics.*` (optional), overridden by `METRICS__*` env vars.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/metrics").required(false))
        .add_source(config::Environment::with_prefix("METRICS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
