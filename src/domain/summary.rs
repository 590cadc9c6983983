// Summary domain model - dashboard totals and daily averages
use super::sample::Sample;
use chrono::Timelike;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub total_deleted: u64,
    pub total_requests: u64,
    pub total_accepted: u64,
    pub total_rejected: u64,
    pub open_requests: u64,
    pub days_in_range: i64,
    pub average_signups_per_day: f64,
    pub average_approvals_per_day: f64,
    pub average_rejections_per_day: f64,
    pub average_deletions_per_day: f64,
    /// Whether the latest sample was taken in the expected noon slot.
    pub sampled_at_noon: bool,
}

impl Summary {
    /// Aggregate the full sample sequence. An empty sequence yields zeros.
    pub fn from_samples(samples: &[Sample], noon_hour: u32) -> Self {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Self::default();
        };

        let latest = &last.record;
        let days_in_range = (last.sample_date() - first.sample_date())
            .num_days()
            .max(1);
        let per_day = |total: u64| total as f64 / days_in_range as f64;

        Self {
            total_users: latest.total_users,
            active_users: last.active_users,
            inactive_users: latest.new_users,
            total_deleted: latest.total_deleted(),
            total_requests: latest.total_requests,
            total_accepted: latest.accepted_requests,
            total_rejected: latest.rejected_requests,
            open_requests: latest.open_requests,
            days_in_range,
            average_signups_per_day: per_day(latest.total_requests),
            average_approvals_per_day: per_day(latest.accepted_requests),
            average_rejections_per_day: per_day(latest.rejected_requests),
            average_deletions_per_day: per_day(latest.total_deleted()),
            sampled_at_noon: latest.sample_date.hour() == noon_hour,
        }
    }
}
