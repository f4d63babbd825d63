//! Database repository for the shared task template catalog.

use crate::db::{errors::Result, models::tasks::TemplateDBResponse};
use sqlx::PgConnection;
use tracing::instrument;

pub struct TaskTemplates<'c> {
    db: &'c mut PgConnection,
}

impl<'c> TaskTemplates<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Template names are globally unique; a duplicate surfaces as
    /// [`crate::db::errors::DbError::UniqueViolation`].
    #[instrument(skip(self), err)]
    pub async fn create(&mut self, name: &str) -> Result<TemplateDBResponse> {
        let template = sqlx::query_as::<_, TemplateDBResponse>(
            "INSERT INTO task_templates (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(template)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<TemplateDBResponse>> {
        let templates = sqlx::query_as::<_, TemplateDBResponse>(
            "SELECT id, name FROM task_templates ORDER BY id",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(templates)
    }
}
