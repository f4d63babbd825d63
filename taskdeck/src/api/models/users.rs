//! API models for tracked users.

use crate::db::models::users::UserDBResponse;
use crate::types::{AdminId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to create a tracked user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserCreate {
    /// Display name
    pub name: String,
    /// Optional group label; users without one land in the fallback group
    pub group: Option<String>,
}

/// Public user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub group: Option<String>,
    pub admin_id: AdminId,
}

impl From<UserDBResponse> for UserResponse {
    fn from(user: UserDBResponse) -> Self {
        Self {
            id: user.id,
            name: user.name,
            group: user.group_name,
            admin_id: user.admin_id,
        }
    }
}
