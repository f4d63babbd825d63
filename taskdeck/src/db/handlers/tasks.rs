//! Database repository for per-user tasks.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::tasks::{TaskCreateDBRequest, TaskDBResponse},
};
use crate::types::{AdminId, TaskId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub user_id: Option<UserId>,
}

impl TaskFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

pub struct Tasks<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Tasks<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch the tasks of every user in `user_ids`, ordered by task id.
    ///
    /// An empty id set yields an empty result without touching the database.
    #[instrument(skip(self, user_ids), fields(count = user_ids.len()), err)]
    pub async fn list_for_users(&mut self, user_ids: &[UserId]) -> Result<Vec<TaskDBResponse>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tasks = sqlx::query_as::<_, TaskDBResponse>(
            "SELECT id, user_id, name FROM tasks WHERE user_id = ANY($1) ORDER BY id",
        )
        .bind(user_ids)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(tasks)
    }

    /// Assign every catalog template to every user in scope, skipping pairs
    /// where the user already has a task with the template's name. Returns
    /// the number of tasks created.
    ///
    /// `admin_id: None` covers all users; `Some` covers one administrator's
    /// roster.
    #[instrument(skip(self), err)]
    pub async fn generate_from_templates(&mut self, admin_id: Option<&AdminId>) -> Result<u64> {
        let result = match admin_id {
            Some(admin_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO tasks (user_id, name)
                    SELECT u.id, t.name
                    FROM users u
                    CROSS JOIN task_templates t
                    WHERE u.admin_id = $1
                      AND NOT EXISTS (
                        SELECT 1 FROM tasks existing
                        WHERE existing.user_id = u.id AND existing.name = t.name
                      )
                    "#,
                )
                .bind(admin_id)
                .execute(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO tasks (user_id, name)
                    SELECT u.id, t.name
                    FROM users u
                    CROSS JOIN task_templates t
                    WHERE NOT EXISTS (
                        SELECT 1 FROM tasks existing
                        WHERE existing.user_id = u.id AND existing.name = t.name
                    )
                    "#,
                )
                .execute(&mut *self.db)
                .await?
            }
        };

        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Tasks<'c> {
    type CreateRequest = TaskCreateDBRequest;
    type Response = TaskDBResponse;
    type Id = TaskId;
    type Filter = TaskFilter;

    #[instrument(skip(self, request), fields(user_id = request.user_id, name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let task = sqlx::query_as::<_, TaskDBResponse>(
            "INSERT INTO tasks (user_id, name) VALUES ($1, $2) RETURNING id, user_id, name",
        )
        .bind(request.user_id)
        .bind(&request.name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(task)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let task = sqlx::query_as::<_, TaskDBResponse>(
            "SELECT id, user_id, name FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(task)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let tasks = match filter.user_id {
            Some(user_id) => {
                sqlx::query_as::<_, TaskDBResponse>(
                    "SELECT id, user_id, name FROM tasks WHERE user_id = $1 ORDER BY id",
                )
                .bind(user_id)
                .fetch_all(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, TaskDBResponse>(
                    "SELECT id, user_id, name FROM tasks ORDER BY id",
                )
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        Ok(tasks)
    }
}
