//! Database models for daily task statuses.

use crate::types::{StatusCode, TaskId, UserId};
use chrono::NaiveDate;

/// One stored status row. At most one exists per (task_id, date).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StatusDBResponse {
    pub user_id: UserId,
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub status: StatusCode,
}
