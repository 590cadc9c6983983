// Response views for chart consumers
use crate::domain::series::{LegendEntry, PlotRow, Series};
use crate::domain::window::DateWindow;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RowView {
    #[serde(flatten)]
    pub row: PlotRow,
    /// Display color per component, following the legend order.
    pub colors: Vec<&'static str>,
}

impl RowView {
    fn new(row: &PlotRow, legend: &[LegendEntry]) -> Self {
        Self {
            row: row.clone(),
            colors: legend.iter().map(|entry| row.color_key(entry)).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeriesView {
    pub kind: String,
    pub chart_name: &'static str,
    pub legend: Vec<LegendEntry>,
    pub total_date_range: Option<DateWindow>,
    pub data_window_range: Option<DateWindow>,
    pub rows: Vec<RowView>,
    /// Position of the selected row within `rows`.
    pub selected_index: Option<usize>,
    pub selection: Option<String>,
    pub value_ticks: Vec<u64>,
    pub date_ticks: Vec<DateTime<Utc>>,
}

impl SeriesView {
    /// Snapshot of the series as seen through its current data window.
    pub fn from_series(series: &Series, tick_count: usize) -> Self {
        let legend = series.legend();
        let rows = series
            .visible_rows()
            .iter()
            .map(|row| RowView::new(row, &legend))
            .collect();

        Self {
            kind: series.kind().to_string(),
            chart_name: series.name(),
            total_date_range: series.total_date_range(),
            data_window_range: series.data_window_range(),
            rows,
            legend,
            selected_index: series.visible_selected_index(),
            selection: series.selection_string(),
            value_ticks: series.value_ticks(tick_count),
            date_ticks: series.date_ticks(tick_count),
        }
    }
}
