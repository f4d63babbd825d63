//! Database models for tasks and the task template catalog.

use crate::types::{TaskId, TemplateId, UserId};

/// Database request for creating a task. The name is copied from a template
/// at creation time and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TaskCreateDBRequest {
    pub user_id: UserId,
    pub name: String,
}

/// Database response for a task
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskDBResponse {
    pub id: TaskId,
    pub user_id: UserId,
    pub name: String,
}

/// Database response for a task template
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TemplateDBResponse {
    pub id: TemplateId,
    pub name: String,
}
