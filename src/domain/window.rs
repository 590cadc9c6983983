// Date window - closed calendar-day interval used to clip series
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A window whose start lies after its end covers no days.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days in the window, both ends included.
    pub fn day_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.day_count())
    }

    pub fn intersect(&self, other: &DateWindow) -> Option<DateWindow> {
        let window = DateWindow::new(self.start.max(other.start), self.end.min(other.end));
        (!window.is_empty()).then_some(window)
    }

    /// Restrict a requested window to `total`.
    ///
    /// Empty requests and requests that miss `total` entirely fall back to
    /// the whole of `total`; partial overlaps are intersected.
    pub fn clamp_to(&self, total: &DateWindow) -> DateWindow {
        if self.is_empty() {
            return *total;
        }
        self.intersect(total).unwrap_or(*total)
    }
}
