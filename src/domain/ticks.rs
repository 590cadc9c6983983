// Axis tick generation for value and date axes
use super::window::DateWindow;
use chrono::{DateTime, NaiveDate, Utc};

pub const DEFAULT_TICK_COUNT: usize = 4;
/// Upper bound on ticks per axis; larger requests are clamped.
pub const MAX_TICK_COUNT: usize = 64;

/// (threshold, divisor) pairs, largest first. The divisor is the threshold
/// divided by four; values at or below 8 use a divisor of 1.
const STEP_LADDER: [(u64, u64); 5] = [(400, 100), (200, 50), (100, 25), (20, 5), (8, 2)];

fn step_divisor(max_value: u64) -> u64 {
    STEP_LADDER
        .iter()
        .find(|(threshold, _)| max_value > *threshold)
        .map(|(_, divisor)| *divisor)
        .unwrap_or(1)
}

/// Evenly spaced ticks starting at zero with a rounded step.
///
/// Returns `desired_count` ticks (at most [`MAX_TICK_COUNT`]) unless the
/// input is degenerate (`max_value <= 0` or `desired_count <= 1`), in which
/// case the result is empty. Ticks past `u64::MAX` are not emitted.
pub fn value_ticks(max_value: i64, desired_count: usize) -> Vec<u64> {
    if max_value <= 0 || desired_count <= 1 {
        return Vec::new();
    }
    let desired_count = desired_count.min(MAX_TICK_COUNT);

    let max_value = max_value as u64;
    let divisor = step_divisor(max_value);
    let raw_step = max_value.div_ceil((desired_count - 1) as u64);
    let step = (raw_step / divisor + 1) * divisor;

    (0..desired_count as u64)
        .map_while(|i| i.checked_mul(step))
        .collect()
}

/// Day ticks at noon, always including the first and last day of `window`.
///
/// Intermediate days are taken every `ceil(days / (desired_count - 1))`
/// days and dropped when they land within one day of the last tick.
pub fn date_ticks(window: &DateWindow, desired_count: usize) -> Vec<DateTime<Utc>> {
    let total_days = window.day_count();
    if total_days <= 1 || desired_count <= 1 {
        return Vec::new();
    }
    let desired_count = desired_count.min(MAX_TICK_COUNT);

    let divisor = total_days.div_ceil(desired_count - 1);
    let last = window.end;

    let mut days: Vec<NaiveDate> = window
        .days()
        .enumerate()
        .filter(|(index, _)| index % divisor == 0)
        .map(|(_, day)| day)
        .filter(|day| *day == window.start || (last - *day).num_days() > 1)
        .take(desired_count - 1)
        .collect();
    days.push(last);

    days.into_iter().filter_map(noon).collect()
}

pub fn noon(day: NaiveDate) -> Option<DateTime<Utc>> {
    day.and_hms_opt(12, 0, 0).map(|dt| dt.and_utc())
}
