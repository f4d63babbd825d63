//! Database repository for administrator accounts.

use crate::db::{
    errors::Result,
    models::admins::{AdminCreateDBRequest, AdminDBResponse},
};
use crate::types::AdminId;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Admins<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Admins<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_account_id(&mut self, account_id: &AdminId) -> Result<Option<AdminDBResponse>> {
        let admin = sqlx::query_as::<_, AdminDBResponse>(
            "SELECT account_id, name, password_hash, role, created_at FROM admins WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(admin)
    }

    /// Insert an administrator, leaving any existing account untouched.
    ///
    /// Used for seeding the initial account at startup, which must be
    /// idempotent across restarts.
    #[instrument(skip(self, request), fields(account_id = %request.account_id), err)]
    pub async fn create_if_absent(&mut self, request: &AdminCreateDBRequest) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO admins (account_id, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (account_id) DO NOTHING
            "#,
        )
        .bind(&request.account_id)
        .bind(&request.name)
        .bind(&request.password_hash)
        .bind(request.role)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
