// Raw snapshot record - one parsed CSV line
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names of the snapshot CSV, in file order.
pub const COLUMNS: [&str; 15] = [
    "sample_date",
    "total_users",
    "new_users",
    "never_set_location",
    "total_requests",
    "accepted_requests",
    "rejected_requests",
    "open_requests",
    "active_in_last_24h",
    "active_in_last_week",
    "active_in_last_30_days",
    "active_in_last_90_days",
    "average_last_active_days",
    "deleted_active",
    "deleted_inactive",
];

/// One observation exactly as it appears in the snapshot file.
///
/// Field order matches [`COLUMNS`] so the record serializes back to the
/// same header it was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub sample_date: DateTime<Utc>,
    pub total_users: u64,
    pub new_users: u64,
    pub never_set_location: u64,
    pub total_requests: u64,
    pub accepted_requests: u64,
    pub rejected_requests: u64,
    pub open_requests: u64,
    pub active_in_last_24h: u64,
    pub active_in_last_week: u64,
    pub active_in_last_30_days: u64,
    pub active_in_last_90_days: u64,
    pub average_last_active_days: u64,
    pub deleted_active: u64,
    pub deleted_inactive: u64,
}

impl RawRecord {
    /// Users that have done something beyond signing up.
    pub fn active_users(&self) -> u64 {
        self.total_users.saturating_sub(self.new_users)
    }

    pub fn total_deleted(&self) -> u64 {
        self.deleted_active + self.deleted_inactive
    }
}
