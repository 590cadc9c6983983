// Series domain model - chart-ready projections of samples
use super::record::RawRecord;
use super::sample::Sample;
use super::ticks::{date_ticks, value_ticks};
use super::window::DateWindow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Trailing activity window for the activity-percentage series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityWindow {
    Day,
    Week,
    Month,
    Quarter,
    /// Average days since last activity instead of a percentage.
    Average,
}

impl ActivityWindow {
    fn active_count(&self, record: &RawRecord) -> u64 {
        match self {
            ActivityWindow::Day => record.active_in_last_24h,
            ActivityWindow::Week => record.active_in_last_week,
            ActivityWindow::Month => record.active_in_last_30_days,
            ActivityWindow::Quarter => record.active_in_last_90_days,
            ActivityWindow::Average => record.average_last_active_days,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ActivityWindow::Day => "in the last 24 hours",
            ActivityWindow::Week => "in the last week",
            ActivityWindow::Month => "in the last 30 days",
            ActivityWindow::Quarter => "in the last 90 days",
            ActivityWindow::Average => "on average",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    UserTotals,
    SignupTotals,
    DeletionTotals,
    ActivityPercentage(ActivityWindow),
}

#[derive(Debug, thiserror::Error)]
#[error("unknown series kind: {0}")]
pub struct UnknownSeriesKind(pub String);

impl SeriesKind {
    pub const ALL: [SeriesKind; 8] = [
        SeriesKind::UserTotals,
        SeriesKind::SignupTotals,
        SeriesKind::DeletionTotals,
        SeriesKind::ActivityPercentage(ActivityWindow::Day),
        SeriesKind::ActivityPercentage(ActivityWindow::Week),
        SeriesKind::ActivityPercentage(ActivityWindow::Month),
        SeriesKind::ActivityPercentage(ActivityWindow::Quarter),
        SeriesKind::ActivityPercentage(ActivityWindow::Average),
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            SeriesKind::UserTotals => "users",
            SeriesKind::SignupTotals => "signups",
            SeriesKind::DeletionTotals => "deletions",
            SeriesKind::ActivityPercentage(ActivityWindow::Day) => "activity-24h",
            SeriesKind::ActivityPercentage(ActivityWindow::Week) => "activity-week",
            SeriesKind::ActivityPercentage(ActivityWindow::Month) => "activity-30d",
            SeriesKind::ActivityPercentage(ActivityWindow::Quarter) => "activity-90d",
            SeriesKind::ActivityPercentage(ActivityWindow::Average) => "activity-average",
        }
    }

    pub fn chart_name(&self) -> &'static str {
        match self {
            SeriesKind::UserTotals => "Total Users",
            SeriesKind::SignupTotals => "Signup Requests",
            SeriesKind::DeletionTotals => "Deleted Accounts",
            SeriesKind::ActivityPercentage(ActivityWindow::Day) => "Active in Last 24 Hours",
            SeriesKind::ActivityPercentage(ActivityWindow::Week) => "Active in Last Week",
            SeriesKind::ActivityPercentage(ActivityWindow::Month) => "Active in Last 30 Days",
            SeriesKind::ActivityPercentage(ActivityWindow::Quarter) => "Active in Last 90 Days",
            SeriesKind::ActivityPercentage(ActivityWindow::Average) => "Days Since Last Active",
        }
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        let entries: &[(&'static str, &'static str)] = match self {
            SeriesKind::UserTotals => &[("Active", "primary"), ("New", "secondary")],
            SeriesKind::SignupTotals => &[("Accepted", "primary"), ("Rejected", "secondary")],
            SeriesKind::DeletionTotals => &[("Active", "primary"), ("Inactive", "secondary")],
            SeriesKind::ActivityPercentage(ActivityWindow::Average) => &[("Days", "primary")],
            SeriesKind::ActivityPercentage(_) => &[("Percent", "primary")],
        };
        entries
            .iter()
            .map(|&(label, color_key)| LegendEntry { label, color_key })
            .collect()
    }

    /// Daily kinds plot one row per calendar day; the others one row per sample.
    pub fn is_daily(&self) -> bool {
        matches!(
            self,
            SeriesKind::UserTotals | SeriesKind::ActivityPercentage(_)
        )
    }

    fn build_row(&self, sample: &Sample) -> PlotRow {
        let components = match self {
            SeriesKind::UserTotals => vec![
                Component::new("active", clamp_to_i64(sample.active_users)),
                Component::new("new", clamp_to_i64(sample.record.new_users)),
            ],
            SeriesKind::SignupTotals => vec![
                Component::new("accepted", sample.new_accepted_requests),
                Component::new("rejected", sample.new_rejected_requests),
            ],
            SeriesKind::DeletionTotals => vec![
                Component::new("active", sample.new_deleted_active),
                Component::new("inactive", sample.new_deleted_inactive),
            ],
            SeriesKind::ActivityPercentage(window) => {
                return activity_row(*window, sample);
            }
        };
        PlotRow::new(sample.sample_date(), components)
    }

    fn describe_row(&self, row: &PlotRow) -> String {
        let when = if self.is_daily() {
            row.date.format("%b %-d, %Y").to_string()
        } else {
            row.date.format("%b %-d, %Y %H:%M").to_string()
        };
        let what = match self {
            SeriesKind::ActivityPercentage(ActivityWindow::Average) => {
                format!("{} days since last active on average", row.total())
            }
            SeriesKind::ActivityPercentage(window) => {
                format!("{}% active {}", row.total(), window.describe())
            }
            _ => row
                .components
                .iter()
                .map(|c| format!("{} {}", c.value, c.label))
                .collect::<Vec<_>>()
                .join(", "),
        };
        format!("{}: {}", when, what)
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SeriesKind {
    type Err = UnknownSeriesKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| UnknownSeriesKind(s.to_string()))
    }
}

fn activity_row(window: ActivityWindow, sample: &Sample) -> PlotRow {
    let count = window.active_count(&sample.record);
    let (value, degenerate) = match window {
        ActivityWindow::Average => (count, false),
        _ if sample.active_users == 0 => (0, true),
        _ => (count.saturating_mul(100) / sample.active_users, false),
    };
    let mut row = PlotRow::new(
        sample.sample_date(),
        vec![Component::new("percent", clamp_to_i64(value))],
    );
    row.degenerate = degenerate;
    row
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub label: &'static str,
    pub value: i64,
}

impl Component {
    pub fn new(label: &'static str, value: i64) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color_key: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotRow {
    pub date: DateTime<Utc>,
    pub components: Vec<Component>,
    pub selected: bool,
    /// The value could not be computed from the source row (zero active users).
    pub degenerate: bool,
}

impl PlotRow {
    pub fn new(date: DateTime<Utc>, components: Vec<Component>) -> Self {
        Self {
            date,
            components,
            selected: false,
            degenerate: false,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Stacked height of the row.
    pub fn total(&self) -> i64 {
        self.components
            .iter()
            .fold(0i64, |total, c| total.saturating_add(c.value))
    }

    pub fn color_key(&self, legend: &LegendEntry) -> &'static str {
        if self.selected {
            "selected"
        } else {
            legend.color_key
        }
    }
}

/// A named view over the samples with a date window and a single selection.
#[derive(Debug, Clone)]
pub struct Series {
    kind: SeriesKind,
    rows: Vec<PlotRow>,
    total_range: Option<DateWindow>,
    data_window: Option<DateWindow>,
}

impl Series {
    pub fn build(kind: SeriesKind, samples: &[Sample]) -> Self {
        let rows: Vec<PlotRow> = if kind.is_daily() {
            last_sample_per_day(samples)
                .map(|sample| kind.build_row(sample))
                .collect()
        } else {
            samples.iter().map(|sample| kind.build_row(sample)).collect()
        };

        let total_range = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => Some(DateWindow::new(first.day(), last.day())),
            _ => None,
        };

        Self {
            kind,
            rows,
            total_range,
            data_window: total_range,
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.chart_name()
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.kind.legend()
    }

    pub fn rows(&self) -> &[PlotRow] {
        &self.rows
    }

    pub fn total_date_range(&self) -> Option<DateWindow> {
        self.total_range
    }

    pub fn data_window_range(&self) -> Option<DateWindow> {
        self.data_window
    }

    /// Set the visible window, clamped to the data that exists.
    ///
    /// An empty request or one outside the data resets to the full range.
    /// Has no effect on an empty series.
    pub fn set_data_window_range(&mut self, requested: DateWindow) {
        if let Some(total) = self.total_range {
            self.data_window = Some(requested.clamp_to(&total));
        }
    }

    pub fn reset_data_window_range(&mut self) {
        self.data_window = self.total_range;
    }

    /// Rows whose calendar day falls inside `window`, both ends included.
    pub fn rows_in_window(&self, window: &DateWindow) -> &[PlotRow] {
        &self.rows[self.window_bounds(window)]
    }

    /// Rows inside the current data window.
    pub fn visible_rows(&self) -> &[PlotRow] {
        &self.rows[self.visible_bounds()]
    }

    /// Index range into [`Series::rows`] covered by `window`.
    fn window_bounds(&self, window: &DateWindow) -> Range<usize> {
        let window = match self.total_range {
            Some(total) => window.clamp_to(&total),
            None => return 0..0,
        };
        let start = self.rows.partition_point(|row| row.day() < window.start);
        let end = self.rows.partition_point(|row| row.day() <= window.end);
        start..end
    }

    fn visible_bounds(&self) -> Range<usize> {
        match self.data_window {
            Some(window) => self.window_bounds(&window),
            None => 0..0,
        }
    }

    /// Position of the selected row within [`Series::visible_rows`].
    pub fn visible_selected_index(&self) -> Option<usize> {
        self.visible_rows().iter().position(|row| row.selected)
    }

    /// Like [`Series::select_row`], with `index` counted from the first
    /// visible row.
    pub fn select_visible_row(&mut self, index: usize, selected: bool) -> Option<bool> {
        let bounds = self.visible_bounds();
        if index >= bounds.len() {
            return None;
        }
        self.select_row(bounds.start + index, selected)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.selected)
    }

    pub fn selected_row(&self) -> Option<&PlotRow> {
        self.rows.iter().find(|row| row.selected)
    }

    /// Set the selection state of one row, clearing every other row first.
    ///
    /// Returns the row's previous state, or `None` when `index` is out of range.
    pub fn select_row(&mut self, index: usize, selected: bool) -> Option<bool> {
        let previous = self.rows.get(index)?.selected;
        self.deselect_all_rows();
        self.rows[index].selected = selected;
        Some(previous)
    }

    /// Like [`Series::select_row`], addressing the first row on `day`.
    pub fn select_row_on(&mut self, day: NaiveDate, selected: bool) -> Option<bool> {
        let index = self.rows.iter().position(|row| row.day() == day)?;
        self.select_row(index, selected)
    }

    pub fn deselect_all_rows(&mut self) {
        for row in &mut self.rows {
            row.selected = false;
        }
    }

    /// Human-readable description of the selected row.
    pub fn selection_string(&self) -> Option<String> {
        self.selected_row().map(|row| self.kind.describe_row(row))
    }

    /// Value-axis ticks sized to the tallest visible row.
    pub fn value_ticks(&self, desired_count: usize) -> Vec<u64> {
        let max = self
            .visible_rows()
            .iter()
            .map(PlotRow::total)
            .max()
            .unwrap_or(0);
        value_ticks(max, desired_count)
    }

    pub fn date_ticks(&self, desired_count: usize) -> Vec<DateTime<Utc>> {
        match self.data_window {
            Some(window) => date_ticks(&window, desired_count),
            None => Vec::new(),
        }
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// The latest sample of each calendar day, in order.
fn last_sample_per_day(samples: &[Sample]) -> impl Iterator<Item = &Sample> {
    samples.iter().enumerate().filter_map(move |(i, sample)| {
        let is_last_of_day = samples
            .get(i + 1)
            .is_none_or(|next| next.day() != sample.day());
        is_last_of_day.then_some(sample)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::compute_samples;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const DAY_ONE: i64 = 1_709_510_400; // 2024-03-04 00:00:00 UTC
    const HOUR: i64 = 3_600;
    const DAY: i64 = 24 * HOUR;

    fn record(ts: i64, total: u64, new: u64) -> RawRecord {
        RawRecord {
            sample_date: Utc.timestamp_opt(ts, 0).unwrap(),
            total_users: total,
            new_users: new,
            ..Default::default()
        }
    }

    /// Two samples a day (00:00 and 12:00) for `days` days.
    fn twice_daily(days: i64) -> Vec<Sample> {
        let records: Vec<RawRecord> = (0..days * 2)
            .map(|i| {
                let mut r = record(DAY_ONE + i * 12 * HOUR, 100 + i as u64 * 10, 10 + i as u64);
                r.total_requests = i as u64 * 3;
                r.accepted_requests = i as u64 * 2;
                r.rejected_requests = i as u64;
                r.deleted_active = i as u64;
                r.active_in_last_week = 45;
                r.average_last_active_days = 6;
                r
            })
            .collect();
        compute_samples(&records)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_kind_round_trips_through_slug() {
        for kind in SeriesKind::ALL {
            assert_eq!(kind.slug().parse::<SeriesKind>().unwrap(), kind);
        }
        assert!("bogus".parse::<SeriesKind>().is_err());
    }

    #[test]
    fn test_user_totals_takes_later_sample_of_each_day() {
        let samples = twice_daily(3);
        let series = Series::build(SeriesKind::UserTotals, &samples);

        assert_eq!(series.rows().len(), 3);
        for (row, sample) in series.rows().iter().zip(samples.iter().skip(1).step_by(2)) {
            assert_eq!(row.date, sample.sample_date());
            assert_eq!(
                row.components,
                vec![
                    Component::new("active", sample.active_users as i64),
                    Component::new("new", sample.record.new_users as i64),
                ]
            );
        }
    }

    #[test]
    fn test_daily_series_handles_irregular_days() {
        let records = vec![
            record(DAY_ONE + 12 * HOUR, 10, 1),
            record(DAY_ONE + DAY, 20, 2),
            record(DAY_ONE + DAY + 6 * HOUR, 30, 3),
            record(DAY_ONE + DAY + 12 * HOUR, 40, 4),
            record(DAY_ONE + 3 * DAY, 50, 5),
        ];
        let series = Series::build(SeriesKind::UserTotals, &compute_samples(&records));

        let days: Vec<_> = series.rows().iter().map(PlotRow::day).collect();
        assert_eq!(days, vec![day(4), day(5), day(7)]);
        assert_eq!(series.rows()[1].components[0].value, 36);
    }

    #[test]
    fn test_signup_and_deletion_series_have_row_per_sample() {
        let samples = twice_daily(2);
        let signups = Series::build(SeriesKind::SignupTotals, &samples);
        let deletions = Series::build(SeriesKind::DeletionTotals, &samples);

        assert_eq!(signups.rows().len(), 4);
        assert_eq!(deletions.rows().len(), 4);
        assert_eq!(
            signups.rows()[2].components,
            vec![Component::new("accepted", 2), Component::new("rejected", 1)]
        );
        assert_eq!(
            deletions.rows()[3].components,
            vec![Component::new("active", 1), Component::new("inactive", 0)]
        );
    }

    #[test]
    fn test_activity_percentage_truncates() {
        let mut r = record(DAY_ONE, 123, 3);
        r.active_in_last_week = 45;
        r.active_in_last_24h = 7;
        r.average_last_active_days = 12;
        let samples = compute_samples(&[r]);

        let week = Series::build(SeriesKind::ActivityPercentage(ActivityWindow::Week), &samples);
        let day = Series::build(SeriesKind::ActivityPercentage(ActivityWindow::Day), &samples);
        let average = Series::build(SeriesKind::ActivityPercentage(ActivityWindow::Average), &samples);

        assert_eq!(week.rows()[0].total(), 37);
        assert_eq!(day.rows()[0].total(), 5);
        assert_eq!(average.rows()[0].total(), 12);
    }

    #[test]
    fn test_activity_percentage_with_no_active_users() {
        let mut r = record(DAY_ONE, 5, 5);
        r.active_in_last_30_days = 4;
        let samples = compute_samples(&[r]);

        let series = Series::build(SeriesKind::ActivityPercentage(ActivityWindow::Month), &samples);

        assert_eq!(series.rows()[0].total(), 0);
        assert!(series.rows()[0].degenerate);
    }

    #[test]
    fn test_selection_is_mutually_exclusive() {
        let mut series = Series::build(SeriesKind::SignupTotals, &twice_daily(3));

        assert_eq!(series.select_row(1, true), Some(false));
        assert_eq!(series.select_row(4, true), Some(false));

        let selected: Vec<_> = series
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| row.selected)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(selected, vec![4]);
        assert_eq!(series.selected_index(), Some(4));
    }

    #[test]
    fn test_select_row_returns_previous_state() {
        let mut series = Series::build(SeriesKind::UserTotals, &twice_daily(3));

        assert_eq!(series.select_row(2, true), Some(false));
        assert_eq!(series.select_row(2, false), Some(true));
        assert_eq!(series.selected_index(), None);
        assert_eq!(series.select_row(99, true), None);
    }

    #[test]
    fn test_select_row_on_day_and_deselect_all() {
        let mut series = Series::build(SeriesKind::UserTotals, &twice_daily(3));

        assert_eq!(series.select_row_on(day(5), true), Some(false));
        assert_eq!(series.selected_index(), Some(1));

        series.deselect_all_rows();
        assert_eq!(series.selected_index(), None);
        assert_eq!(series.selection_string(), None);
    }

    #[test]
    fn test_selection_string() {
        let mut series = Series::build(SeriesKind::UserTotals, &twice_daily(2));
        series.select_row(0, true);
        assert_eq!(
            series.selection_string().unwrap(),
            "Mar 4, 2024: 99 active, 11 new"
        );

        let mut week = Series::build(
            SeriesKind::ActivityPercentage(ActivityWindow::Week),
            &twice_daily(2),
        );
        week.select_row(0, true);
        assert_eq!(
            week.selection_string().unwrap(),
            "Mar 4, 2024: 45% active in the last week"
        );
    }

    #[test]
    fn test_window_defaults_to_total_range() {
        let series = Series::build(SeriesKind::UserTotals, &twice_daily(5));
        let total = DateWindow::new(day(4), day(8));
        assert_eq!(series.total_date_range(), Some(total));
        assert_eq!(series.data_window_range(), Some(total));
        assert_eq!(series.visible_rows().len(), 5);
    }

    #[test]
    fn test_empty_window_resets_to_total_range() {
        let mut series = Series::build(SeriesKind::UserTotals, &twice_daily(5));
        series.set_data_window_range(DateWindow::new(day(6), day(5)));
        assert_eq!(series.data_window_range(), series.total_date_range());
    }

    #[test]
    fn test_window_filter_is_inclusive() {
        let mut series = Series::build(SeriesKind::SignupTotals, &twice_daily(5));
        series.set_data_window_range(DateWindow::new(day(5), day(6)));

        let rows = series.visible_rows();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.day() >= day(5) && row.day() <= day(6)));

        series.reset_data_window_range();
        assert_eq!(series.visible_rows().len(), 10);
    }

    #[test]
    fn test_window_outside_data_is_clamped() {
        let mut series = Series::build(SeriesKind::UserTotals, &twice_daily(5));
        series.set_data_window_range(DateWindow::new(day(7), day(30)));
        assert_eq!(series.data_window_range(), Some(DateWindow::new(day(7), day(8))));
        assert_eq!(series.rows_in_window(&DateWindow::new(day(20), day(30))).len(), 5);
    }

    #[test]
    fn test_series_ticks() {
        let series = Series::build(SeriesKind::UserTotals, &twice_daily(10));
        // tallest row: 100 + 19 * 10 = 290 users
        assert_eq!(series.value_ticks(4), vec![0, 100, 200, 300]);
        assert_eq!(series.date_ticks(4).len(), 3);
    }

    #[test]
    fn test_visible_selection_counts_from_window_start() {
        let mut series = Series::build(SeriesKind::SignupTotals, &twice_daily(5));
        series.set_data_window_range(DateWindow::new(day(6), day(7)));

        assert_eq!(series.select_visible_row(1, true), Some(false));
        assert_eq!(series.selected_index(), Some(5));
        assert_eq!(series.visible_selected_index(), Some(1));
        assert!(series.visible_rows()[1].selected);

        assert_eq!(series.select_visible_row(4, true), None);
        assert_eq!(series.selected_index(), Some(5));
    }

    #[test]
    fn test_selection_outside_window_is_not_visible() {
        let mut series = Series::build(SeriesKind::UserTotals, &twice_daily(5));
        series.set_data_window_range(DateWindow::new(day(6), day(8)));
        series.select_row(0, true);

        assert_eq!(series.selected_index(), Some(0));
        assert_eq!(series.visible_selected_index(), None);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let mut huge = compute_samples(&[record(DAY_ONE, u64::MAX, u64::MAX - 1)]);
        huge[0].active_users = u64::MAX;
        let series = Series::build(SeriesKind::UserTotals, &huge);

        let row = &series.rows()[0];
        assert_eq!(row.components[0].value, i64::MAX);
        assert_eq!(row.components[1].value, i64::MAX);
        assert_eq!(row.total(), i64::MAX);
    }

    #[test]
    fn test_empty_series() {
        let mut series = Series::build(SeriesKind::UserTotals, &[]);
        assert!(series.rows().is_empty());
        assert_eq!(series.total_date_range(), None);
        series.set_data_window_range(DateWindow::new(day(1), day(2)));
        assert_eq!(series.data_window_range(), None);
        assert!(series.visible_rows().is_empty());
        assert!(series.value_ticks(4).is_empty());
        assert!(series.date_ticks(4).is_empty());
        assert_eq!(series.select_row(0, true), None);
    }
}
