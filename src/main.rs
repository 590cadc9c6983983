// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::metrics_service::MetricsService;
use crate::infrastructure::config::load_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_dataset, dataset_status, health_check, reload_dataset, series, snapshot_csv, summary,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("usage_metrics=info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;

    // Create snapshot source (infrastructure layer)
    let source = config.source.build()?;
    tracing::info!("Reading snapshots from {}", source.describe());

    // Create service (application layer)
    let metrics_service = MetricsService::new(
        source,
        config.source.timeout(),
        config.sampling.noon_hour,
    );

    // Initial load runs in the background; requests see an empty dataset until it lands
    {
        let metrics_service = metrics_service.clone();
        tokio::spawn(async move {
            metrics_service.reload().await;
        });
    }

    let state = Arc::new(AppState {
        metrics_service,
        tick_count: config.sampling.tick_count,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dataset", get(dataset_status))
        .route("/dataset/reload", post(reload_dataset))
        .route("/dataset/clear", post(clear_dataset))
        .route("/summary", get(summary))
        .route("/series/:kind", get(series))
        .route("/snapshot.csv", get(snapshot_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting usage-metrics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
