//! API models for recording daily task statuses.
//!
//! Two shapes exist on purpose. The single-item [`StatusUpdate`] is strict:
//! anything malformed or out of range is a 400. The batch body mirrors a
//! submitted grid of form fields and is lenient: entries that do not parse
//! are skipped and counted, so one stray field never loses a whole page of
//! edits.

use crate::errors::{Error, Result};
use crate::types::{StatusCode, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Stored status codes: 0 pending, 1 completed, 2 rest, 3 not applicable.
pub const STATUS_RANGE: std::ops::RangeInclusive<StatusCode> = 0..=3;

/// Strict request to record one task-day status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub date: NaiveDate,
    /// 0 pending, 1 completed, 2 rest, 3 not applicable
    pub status: StatusCode,
}

impl StatusUpdate {
    pub fn validate(&self) -> Result<()> {
        if !STATUS_RANGE.contains(&self.status) {
            return Err(Error::BadRequest {
                message: format!("status {} is out of range (expected 0-3)", self.status),
            });
        }
        Ok(())
    }
}

/// Batch body: grid field names (`task_{id}_{date}`) mapped to status values.
pub type BatchStatusRequest = HashMap<String, String>;

/// One recognized batch entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub status: StatusCode,
}

impl BatchEntry {
    /// Parse a grid field into an entry. Returns `None` for anything that is
    /// not a well-formed `task_{id}_{YYYY-MM-DD}` key with an in-range
    /// numeric value.
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        let rest = key.strip_prefix("task_")?;
        let (id_part, date_part) = rest.split_once('_')?;
        let task_id: TaskId = id_part.parse().ok()?;
        let date: NaiveDate = date_part.parse().ok()?;
        let status: StatusCode = value.trim().parse().ok()?;
        if !STATUS_RANGE.contains(&status) {
            return None;
        }
        Some(Self { task_id, date, status })
    }
}

/// Outcome of a batch submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchStatusResponse {
    /// Entries written
    pub applied: usize,
    /// Entries ignored: malformed keys, out-of-range values, unknown tasks
    pub skipped: usize,
}

/// Response for a single status write
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub task_id: TaskId,
    pub user_id: crate::types::UserId,
    pub date: NaiveDate,
    pub status: StatusCode,
}

impl From<crate::db::models::statuses::StatusDBResponse> for StatusResponse {
    fn from(row: crate::db::models::statuses::StatusDBResponse) -> Self {
        Self {
            task_id: row.task_id,
            user_id: row.user_id,
            date: row.date,
            status: row.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_grid_key() {
        let entry = BatchEntry::parse("task_42_2025-06-03", "1").unwrap();
        assert_eq!(entry.task_id, 42);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert_eq!(entry.status, 1);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(BatchEntry::parse("tasks_42_2025-06-03", "1").is_none());
        assert!(BatchEntry::parse("task_2025-06-03", "1").is_none());
        assert!(BatchEntry::parse("task_x_2025-06-03", "1").is_none());
        assert!(BatchEntry::parse("task_42_June-3rd", "1").is_none());
        assert!(BatchEntry::parse("", "1").is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(BatchEntry::parse("task_42_2025-06-03", "").is_none());
        assert!(BatchEntry::parse("task_42_2025-06-03", "done").is_none());
        assert!(BatchEntry::parse("task_42_2025-06-03", "7").is_none());
        assert!(BatchEntry::parse("task_42_2025-06-03", "-1").is_none());
    }

    #[test]
    fn tolerates_whitespace_around_value() {
        let entry = BatchEntry::parse("task_7_2025-01-15", " 2 ").unwrap();
        assert_eq!(entry.status, 2);
    }

    #[test]
    fn strict_update_validates_range() {
        let ok = StatusUpdate {
            task_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            status: 3,
        };
        assert!(ok.validate().is_ok());

        let bad = StatusUpdate { status: 9, ..ok };
        assert!(bad.validate().is_err());
    }
}
