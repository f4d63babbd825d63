//! API models for administrator accounts.

use crate::types::AdminId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrator role.
///
/// `Admin` sees only their own roster; `SuperAdmin` sees every user in the
/// system. Stored in postgres as the `admin_role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

/// The authenticated administrator, extracted from the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentAdmin {
    pub account_id: AdminId,
    pub name: String,
    pub role: Role,
}

/// Public administrator representation (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub account_id: AdminId,
    pub name: String,
    pub role: Role,
}

impl From<crate::db::models::admins::AdminDBResponse> for AdminResponse {
    fn from(admin: crate::db::models::admins::AdminDBResponse) -> Self {
        Self {
            account_id: admin.account_id,
            name: admin.name,
            role: admin.role,
        }
    }
}
