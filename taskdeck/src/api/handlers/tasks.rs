use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        handlers::users::get_user_in_scope,
        models::{
            admins::CurrentAdmin,
            tasks::{GenerateTasksResponse, TaskCreate, TaskResponse, TemplateCreate, TemplateResponse},
        },
    },
    db::{
        handlers::{Repository, TaskTemplates, Tasks, Users, tasks::TaskFilter},
        models::tasks::TaskCreateDBRequest,
    },
    errors::Error,
    types::UserId,
};

/// List one user's tasks
#[utoipa::path(
    get,
    path = "/users/{user_id}/tasks",
    tag = "tasks",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Tasks of the user", body = Vec<TaskResponse>),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id, user_id))]
pub async fn list_user_tasks(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<TaskResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mut user_repo = Users::new(&mut conn);
    get_user_in_scope(&mut user_repo, &admin, user_id).await?;

    let mut task_repo = Tasks::new(&mut conn);
    let tasks = task_repo.list(&TaskFilter::for_user(user_id)).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Assign a template to a user as a new task
#[utoipa::path(
    post,
    path = "/users/{user_id}/tasks",
    request_body = TaskCreate,
    tag = "tasks",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 404, description = "User or template not found"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id, user_id))]
pub async fn create_user_task(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(user_id): Path<UserId>,
    Json(request): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskResponse>), Error> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let mut user_repo = Users::new(&mut tx);
    get_user_in_scope(&mut user_repo, &admin, user_id).await?;

    // Task names are copied from the catalog, never free-form.
    let mut template_repo = TaskTemplates::new(&mut tx);
    let template = template_repo
        .list()
        .await?
        .into_iter()
        .find(|t| t.id == request.template_id)
        .ok_or_else(|| Error::NotFound {
            resource: "task template".to_string(),
            id: request.template_id.to_string(),
        })?;

    let mut task_repo = Tasks::new(&mut tx);
    let created = task_repo
        .create(&TaskCreateDBRequest {
            user_id,
            name: template.name,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// List the template catalog
#[utoipa::path(
    get,
    path = "/task-templates",
    tag = "tasks",
    responses(
        (status = 200, description = "Template catalog", body = Vec<TemplateResponse>),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn list_templates(State(state): State<AppState>, admin: CurrentAdmin) -> Result<Json<Vec<TemplateResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut template_repo = TaskTemplates::new(&mut conn);

    let templates = template_repo.list().await?;

    Ok(Json(templates.into_iter().map(TemplateResponse::from).collect()))
}

/// Add a template to the catalog
#[utoipa::path(
    post,
    path = "/task-templates",
    request_body = TemplateCreate,
    tag = "tasks",
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Template name already exists"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn create_template(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Json(request): Json<TemplateCreate>,
) -> Result<(StatusCode, Json<TemplateResponse>), Error> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::BadRequest {
            message: "Template name must not be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut template_repo = TaskTemplates::new(&mut conn);

    let created = template_repo.create(name).await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(created))))
}

/// Assign every template to every user in scope
#[utoipa::path(
    post,
    path = "/tasks/generate",
    tag = "tasks",
    responses(
        (status = 200, description = "Fan-out complete", body = GenerateTasksResponse),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn generate_tasks(State(state): State<AppState>, admin: CurrentAdmin) -> Result<Json<GenerateTasksResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut task_repo = Tasks::new(&mut conn);

    let scope = if admin.role.is_super_admin() {
        None
    } else {
        Some(&admin.account_id)
    };
    let created = task_repo.generate_from_templates(scope).await?;

    Ok(Json(GenerateTasksResponse { created }))
}

#[cfg(test)]
mod tests {
    use crate::api::models::admins::Role;
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn task_name_is_copied_from_template(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let user = create_test_user(&pool, "alpha", "Ann", None).await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        let template: serde_json::Value = server
            .post("/admin/api/v1/task-templates")
            .add_header("cookie", cookie.clone())
            .json(&serde_json::json!({"name": "daily review"}))
            .await
            .json();

        let response = server
            .post(&format!("/admin/api/v1/users/{}/tasks", user.id))
            .add_header("cookie", cookie)
            .json(&serde_json::json!({"template_id": template["id"]}))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let task: serde_json::Value = response.json();
        assert_eq!(task["name"], "daily review");
        assert_eq!(task["user_id"], user.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_template_name_conflicts(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        let first = server
            .post("/admin/api/v1/task-templates")
            .add_header("cookie", cookie.clone())
            .json(&serde_json::json!({"name": "daily review"}))
            .await;
        first.assert_status(axum::http::StatusCode::CREATED);

        let second = server
            .post("/admin/api/v1/task-templates")
            .add_header("cookie", cookie)
            .json(&serde_json::json!({"name": "daily review"}))
            .await;
        second.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn other_admins_users_read_as_missing(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        create_test_admin(&pool, "beta", "password-beta", Role::Admin).await;
        let foreign = create_test_user(&pool, "beta", "Bob", None).await;

        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;
        let response = server
            .get(&format!("/admin/api/v1/users/{}/tasks", foreign.id))
            .add_header("cookie", cookie)
            .await;

        response.assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn generate_skips_existing_name_matches(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        create_test_user(&pool, "alpha", "Ann", None).await;
        create_test_user(&pool, "alpha", "Bob", None).await;
        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;

        for name in ["review", "standup"] {
            server
                .post("/admin/api/v1/task-templates")
                .add_header("cookie", cookie.clone())
                .json(&serde_json::json!({"name": name}))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let first: serde_json::Value = server
            .post("/admin/api/v1/tasks/generate")
            .add_header("cookie", cookie.clone())
            .await
            .json();
        assert_eq!(first["created"], 4);

        // Second run finds every pair already covered.
        let second: serde_json::Value = server
            .post("/admin/api/v1/tasks/generate")
            .add_header("cookie", cookie)
            .await
            .json();
        assert_eq!(second["created"], 0);
    }
}
