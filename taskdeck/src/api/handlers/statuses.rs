use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{
        admins::CurrentAdmin,
        statuses::{BatchEntry, BatchStatusRequest, BatchStatusResponse, StatusResponse, StatusUpdate},
    },
    db::{errors::DbError, handlers::Statuses},
    errors::Error,
};

/// Record one task-day status
#[utoipa::path(
    post,
    path = "/statuses",
    request_body = StatusUpdate,
    tag = "statuses",
    responses(
        (status = 200, description = "Status recorded", body = StatusResponse),
        (status = 400, description = "Status code out of range"),
        (status = 404, description = "Task not found"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id, task_id = request.task_id))]
pub async fn update_status(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Json(request): Json<StatusUpdate>,
) -> Result<Json<StatusResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut status_repo = Statuses::new(&mut conn);

    let row = status_repo
        .upsert(request.task_id, request.date, request.status)
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::NotFound {
                resource: "task".to_string(),
                id: request.task_id.to_string(),
            },
            other => Error::Database(other),
        })?;

    Ok(Json(StatusResponse::from(row)))
}

/// Record a submitted grid of task-day statuses
///
/// Lenient by design: entries with malformed keys, out-of-range values or
/// unknown task ids are skipped and counted, and everything else commits
/// atomically.
#[utoipa::path(
    post,
    path = "/statuses/batch",
    tag = "statuses",
    responses(
        (status = 200, description = "Batch processed", body = BatchStatusResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id, entries = request.len()))]
pub async fn update_statuses_batch(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Json(request): Json<BatchStatusRequest>,
) -> Result<Json<BatchStatusResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut status_repo = Statuses::new(&mut tx);

    let mut applied = 0;
    let mut skipped = 0;

    for (key, value) in &request {
        let Some(entry) = BatchEntry::parse(key, value) else {
            skipped += 1;
            continue;
        };

        match status_repo.upsert(entry.task_id, entry.date, entry.status).await {
            Ok(_) => applied += 1,
            // Stale grids can reference tasks deleted since render; drop
            // those pairs and keep the rest of the submission.
            Err(DbError::NotFound) => skipped += 1,
            Err(other) => return Err(Error::Database(other)),
        }
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(BatchStatusResponse { applied, skipped }))
}

#[cfg(test)]
mod tests {
    use crate::api::models::admins::Role;
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn single_update_is_idempotent_and_last_writer_wins(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let user = create_test_user(&pool, "alpha", "Ann", None).await;
        let task = create_test_task(&pool, user.id, "review").await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        for status in [1, 2] {
            let response = server
                .post("/admin/api/v1/statuses")
                .add_header("cookie", cookie.clone())
                .json(&serde_json::json!({"task_id": task.id, "date": "2025-06-04", "status": status}))
                .await;
            response.assert_status_ok();
        }

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task_statuses WHERE task_id = $1")
            .bind(task.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored: i16 = sqlx::query_scalar("SELECT status FROM task_statuses WHERE task_id = $1")
            .bind(task.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn concurrent_updates_of_same_day_leave_one_row(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let user = create_test_user(&pool, "alpha", "Ann", None).await;
        let task = create_test_task(&pool, user.id, "review").await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        // Two writers race on the same (task, date); the conflict target
        // serializes them, so both succeed and the loser overwrites the
        // winner's row instead of inserting a duplicate.
        let first = server
            .post("/admin/api/v1/statuses")
            .add_header("cookie", cookie.clone())
            .json(&serde_json::json!({"task_id": task.id, "date": "2025-06-04", "status": 1}));
        let second = server
            .post("/admin/api/v1/statuses")
            .add_header("cookie", cookie.clone())
            .json(&serde_json::json!({"task_id": task.id, "date": "2025-06-04", "status": 2}));
        let (first, second) = tokio::join!(first, second);
        first.assert_status_ok();
        second.assert_status_ok();

        let stored: Vec<i16> = sqlx::query_scalar("SELECT status FROM task_statuses WHERE task_id = $1")
            .bind(task.id)
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0] == 1 || stored[0] == 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn single_update_rejects_out_of_range_status(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let user = create_test_user(&pool, "alpha", "Ann", None).await;
        let task = create_test_task(&pool, user.id, "review").await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        let response = server
            .post("/admin/api/v1/statuses")
            .add_header("cookie", cookie)
            .json(&serde_json::json!({"task_id": task.id, "date": "2025-06-04", "status": 9}))
            .await;

        response.assert_status_bad_request();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn single_update_reports_unknown_task(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        let response = server
            .post("/admin/api/v1/statuses")
            .add_header("cookie", cookie)
            .json(&serde_json::json!({"task_id": 9999, "date": "2025-06-04", "status": 1}))
            .await;

        response.assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn batch_commits_good_entries_and_counts_bad_ones(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let user = create_test_user(&pool, "alpha", "Ann", None).await;
        let task = create_test_task(&pool, user.id, "review").await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        let mut grid = std::collections::HashMap::new();
        grid.insert(format!("task_{}_2025-06-04", task.id), "1".to_string());
        grid.insert("task_garbage_2025-06-04".to_string(), "1".to_string());
        grid.insert(format!("task_{}_2025-06-05", task.id), "7".to_string());
        grid.insert("task_9999_2025-06-04".to_string(), "1".to_string());

        let response = server
            .post("/admin/api/v1/statuses/batch")
            .add_header("cookie", cookie)
            .json(&grid)
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["applied"], 1);
        assert_eq!(body["skipped"], 3);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task_statuses")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
