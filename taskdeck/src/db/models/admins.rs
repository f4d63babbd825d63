//! Database models for administrators.

use crate::api::models::admins::Role;
use crate::types::AdminId;
use chrono::{DateTime, Utc};

/// Database request for creating (or re-seeding) an administrator
#[derive(Debug, Clone)]
pub struct AdminCreateDBRequest {
    pub account_id: AdminId,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Database response for an administrator
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminDBResponse {
    pub account_id: AdminId,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
