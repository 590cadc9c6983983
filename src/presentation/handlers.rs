// HTTP request handlers
use crate::domain::dataset::DatasetStatus;
use crate::domain::series::SeriesKind;
use crate::domain::summary::Summary;
use crate::domain::ticks::MAX_TICK_COUNT;
use crate::domain::window::DateWindow;
use crate::presentation::app_state::AppState;
use crate::presentation::views::SeriesView;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub selected: Option<usize>,
    pub ticks: Option<usize>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn dataset_status(State(state): State<Arc<AppState>>) -> Json<DatasetStatus> {
    Json(state.metrics_service.status().await)
}

/// Re-fetch the snapshot and rebuild everything derived from it
pub async fn reload_dataset(State(state): State<Arc<AppState>>) -> Json<DatasetStatus> {
    Json(state.metrics_service.reload().await)
}

pub async fn clear_dataset(State(state): State<Arc<AppState>>) -> Json<DatasetStatus> {
    Json(state.metrics_service.clear().await)
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<Summary> {
    Json(state.metrics_service.summary().await)
}

/// One chart's rows, ticks and selection, clipped to the requested window
pub async fn series(
    Path(kind): Path<String>,
    Query(query): Query<SeriesQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeriesView>, (StatusCode, String)> {
    let kind = kind
        .parse::<SeriesKind>()
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;

    let mut series = state.metrics_service.series(kind).await;

    if let Some(total) = series.total_date_range() {
        if query.start.is_some() || query.end.is_some() {
            let requested = DateWindow::new(
                query.start.unwrap_or(total.start),
                query.end.unwrap_or(total.end),
            );
            series.set_data_window_range(requested);
        }
    }

    let ticks = tick_count(query.ticks, state.tick_count)?;

    // Row indices count from the first row inside the window.
    if let Some(index) = query.selected {
        if series.select_visible_row(index, true).is_none() {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("row {} is out of range", index),
            ));
        }
    }

    Ok(Json(SeriesView::from_series(&series, ticks)))
}

fn tick_count(requested: Option<usize>, default: usize) -> Result<usize, (StatusCode, String)> {
    match requested {
        None => Ok(default),
        Some(count) if (2..=MAX_TICK_COUNT).contains(&count) => Ok(count),
        Some(count) => Err((
            StatusCode::BAD_REQUEST,
            format!("ticks must be between 2 and {}, got {}", MAX_TICK_COUNT, count),
        )),
    }
}

/// The loaded snapshot re-serialized as CSV
pub async fn snapshot_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics_service.export_csv().await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "text/csv")], body)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to export snapshot");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
