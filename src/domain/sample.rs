// Sample domain model - a raw record enriched with period-over-period deltas
use super::record::RawRecord;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub record: RawRecord,
    pub active_users: u64,
    pub change_in_total_users: i64,
    pub change_in_new_users: i64,
    pub change_in_active_users: i64,
    pub change_in_never_set_location: i64,
    pub new_requests: i64,
    pub new_accepted_requests: i64,
    pub new_rejected_requests: i64,
    pub new_deleted_active: i64,
    pub new_deleted_inactive: i64,
    pub new_self_deleted_active: i64,
}

impl Sample {
    pub fn sample_date(&self) -> DateTime<Utc> {
        self.record.sample_date
    }

    /// Calendar day (UTC) the sample belongs to.
    pub fn day(&self) -> NaiveDate {
        self.record.sample_date.date_naive()
    }
}

/// Derive a sample from `current` and the record immediately before it.
///
/// With no previous record every "previous" value is zero, so the deltas
/// of the first sample equal its raw fields.
pub fn compute_delta(current: &RawRecord, previous: Option<&RawRecord>) -> Sample {
    let zero = RawRecord::default();
    let previous = previous.unwrap_or(&zero);

    let active_users = current.active_users();
    let change_in_active_users = delta(active_users, previous.active_users());
    let new_deleted_active = delta(current.deleted_active, previous.deleted_active);

    Sample {
        record: current.clone(),
        active_users,
        change_in_total_users: delta(current.total_users, previous.total_users),
        change_in_new_users: delta(current.new_users, previous.new_users),
        change_in_active_users,
        change_in_never_set_location: delta(
            current.never_set_location,
            previous.never_set_location,
        ),
        new_requests: delta(current.total_requests, previous.total_requests),
        new_accepted_requests: delta(current.accepted_requests, previous.accepted_requests),
        new_rejected_requests: delta(current.rejected_requests, previous.rejected_requests),
        new_deleted_active,
        new_deleted_inactive: delta(current.deleted_inactive, previous.deleted_inactive),
        new_self_deleted_active: change_in_active_users
            .saturating_sub(new_deleted_active)
            .max(0),
    }
}

/// Enrich an ordered record sequence, each record against its predecessor.
pub fn compute_samples(records: &[RawRecord]) -> Vec<Sample> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| compute_delta(record, i.checked_sub(1).map(|p| &records[p])))
        .collect()
}

fn delta(current: u64, previous: u64) -> i64 {
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    let previous = i64::try_from(previous).unwrap_or(i64::MAX);
    current.saturating_sub(previous)
}
