//! API models for tasks and task templates.

use crate::db::models::tasks::{TaskDBResponse, TemplateDBResponse};
use crate::types::{TaskId, TemplateId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to assign a task from the template catalog to a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskCreate {
    /// Template to copy the task name from
    pub template_id: TemplateId,
}

/// Public task representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: TaskId,
    pub user_id: UserId,
    pub name: String,
}

impl From<TaskDBResponse> for TaskResponse {
    fn from(task: TaskDBResponse) -> Self {
        Self {
            id: task.id,
            user_id: task.user_id,
            name: task.name,
        }
    }
}

/// Request to add a template to the catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateCreate {
    /// Template name (globally unique)
    pub name: String,
}

/// Public template representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub id: TemplateId,
    pub name: String,
}

impl From<TemplateDBResponse> for TemplateResponse {
    fn from(template: TemplateDBResponse) -> Self {
        Self {
            id: template.id,
            name: template.name,
        }
    }
}

/// Result of a template fan-out run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateTasksResponse {
    /// Number of tasks created; existing name matches are skipped
    pub created: u64,
}
