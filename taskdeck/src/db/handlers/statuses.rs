//! Database repository for daily task statuses.

use crate::db::{
    errors::{DbError, Result},
    models::statuses::StatusDBResponse,
};
use crate::reporting::StatusMap;
use crate::types::{StatusCode, TaskId};
use chrono::NaiveDate;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Statuses<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Statuses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch stored statuses for a set of tasks, keyed by task id and date.
    ///
    /// `range` is an inclusive date window; `None` fetches every stored day.
    /// An empty task set yields an empty map without touching the database.
    #[instrument(skip(self, task_ids), fields(count = task_ids.len()), err)]
    pub async fn get_for_tasks(
        &mut self,
        task_ids: &[TaskId],
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<StatusMap> {
        if task_ids.is_empty() {
            return Ok(StatusMap::new());
        }

        let rows = match range {
            Some((from, to)) => {
                sqlx::query_as::<_, StatusDBResponse>(
                    r#"
                    SELECT user_id, task_id, date, status
                    FROM task_statuses
                    WHERE task_id = ANY($1) AND date >= $2 AND date <= $3
                    "#,
                )
                .bind(task_ids)
                .bind(from)
                .bind(to)
                .fetch_all(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, StatusDBResponse>(
                    "SELECT user_id, task_id, date, status FROM task_statuses WHERE task_id = ANY($1)",
                )
                .bind(task_ids)
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        let mut map = StatusMap::new();
        for row in rows {
            map.entry(row.task_id)
                .or_default()
                .insert(row.date, row.status);
        }

        Ok(map)
    }

    /// Record a status for one task-day, replacing any previous value.
    ///
    /// The owning user is resolved from the task; an unknown task id is
    /// [`DbError::NotFound`]. The write is a single `INSERT .. ON CONFLICT`,
    /// so concurrent updates to the same day serialize on the row and the
    /// last writer wins.
    #[instrument(skip(self), err)]
    pub async fn upsert(
        &mut self,
        task_id: TaskId,
        date: NaiveDate,
        status: StatusCode,
    ) -> Result<StatusDBResponse> {
        let row = sqlx::query_as::<_, StatusDBResponse>(
            r#"
            INSERT INTO task_statuses (user_id, task_id, date, status)
            SELECT t.user_id, t.id, $2, $3 FROM tasks t WHERE t.id = $1
            ON CONFLICT (task_id, date)
            DO UPDATE SET status = EXCLUDED.status, updated_at = now()
            RETURNING user_id, task_id, date, status
            "#,
        )
        .bind(task_id)
        .bind(date)
        .bind(status)
        .fetch_optional(&mut *self.db)
        .await?;

        // The INSERT .. SELECT inserts zero rows when the task is unknown.
        row.ok_or(DbError::NotFound)
    }
}
