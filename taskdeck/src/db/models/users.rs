//! Database models for tracked users.

use crate::api::models::users::UserCreate;
use crate::types::{AdminId, UserId};

/// Database request for creating a tracked user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
    pub group_name: Option<String>,
    pub admin_id: AdminId,
}

impl UserCreateDBRequest {
    /// Attach the owning administrator to an API create request.
    pub fn new(admin_id: AdminId, api: UserCreate) -> Self {
        Self {
            name: api.name,
            group_name: api.group,
            admin_id,
        }
    }
}

/// Database response for a tracked user
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub name: String,
    pub group_name: Option<String>,
    pub admin_id: AdminId,
}
