//! Database repository for tracked users.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::{AdminId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing users.
///
/// `admin_id: None` lists every user (super admin view); `Some` restricts
/// the listing to one administrator's roster.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub admin_id: Option<AdminId>,
}

impl UserFilter {
    pub fn owned_by(admin_id: AdminId) -> Self {
        Self {
            admin_id: Some(admin_id),
        }
    }

    pub fn all() -> Self {
        Self { admin_id: None }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (name, group_name, admin_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, group_name, admin_id
            "#,
        )
        .bind(&request.name)
        .bind(&request.group_name)
        .bind(&request.admin_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            "SELECT id, name, group_name, admin_id FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    /// Listing order is by insertion (serial id), which downstream grouping
    /// relies on for stable group ordering.
    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = match &filter.admin_id {
            Some(admin_id) => {
                sqlx::query_as::<_, UserDBResponse>(
                    "SELECT id, name, group_name, admin_id FROM users WHERE admin_id = $1 ORDER BY id",
                )
                .bind(admin_id)
                .fetch_all(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, UserDBResponse>(
                    "SELECT id, name, group_name, admin_id FROM users ORDER BY id",
                )
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        Ok(users)
    }
}
