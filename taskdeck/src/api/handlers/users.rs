use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::{
        admins::CurrentAdmin,
        users::{UserCreate, UserResponse},
    },
    db::{
        handlers::{Repository, Users, users::UserFilter},
        models::users::{UserCreateDBRequest, UserDBResponse},
    },
    errors::Error,
    types::UserId,
};

/// The user listing the given administrator is allowed to see.
pub(crate) fn scope_filter(admin: &CurrentAdmin) -> UserFilter {
    if admin.role.is_super_admin() {
        UserFilter::all()
    } else {
        UserFilter::owned_by(admin.account_id.clone())
    }
}

/// Fetch one user and check the administrator may see them. An existing user
/// outside the scope reads the same as a missing one.
pub(crate) async fn get_user_in_scope(
    users: &mut Users<'_>,
    admin: &CurrentAdmin,
    user_id: UserId,
) -> Result<UserDBResponse, Error> {
    let user = users.get_by_id(user_id).await?.ok_or_else(|| Error::NotFound {
        resource: "user".to_string(),
        id: user_id.to_string(),
    })?;

    if !admin.role.is_super_admin() && user.admin_id != admin.account_id {
        return Err(Error::NotFound {
            resource: "user".to_string(),
            id: user_id.to_string(),
        });
    }

    Ok(user)
}

/// List users visible to the current administrator
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn list_users(State(state): State<AppState>, admin: CurrentAdmin) -> Result<Json<Vec<UserResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    let users = user_repo.list(&scope_filter(&admin)).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user under the current administrator
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserCreate,
    tag = "users",
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn create_user(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Json(request): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), Error> {
    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "User name must not be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    let created = user_repo
        .create(&UserCreateDBRequest::new(admin.account_id.clone(), request))
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

#[cfg(test)]
mod tests {
    use crate::api::models::admins::Role;
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn admin_sees_only_own_users(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        create_test_admin(&pool, "beta", "password-beta", Role::Admin).await;
        create_test_user(&pool, "alpha", "Ann", Some("A")).await;
        create_test_user(&pool, "beta", "Bob", None).await;

        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;
        let response = server.get("/admin/api/v1/users").add_header("cookie", cookie).await;

        response.assert_status_ok();
        let users: Vec<serde_json::Value> = response.json();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["name"], "Ann");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn super_admin_sees_everyone(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        create_test_admin(&pool, "root", "password-root", Role::SuperAdmin).await;
        create_test_user(&pool, "alpha", "Ann", Some("A")).await;
        create_test_user(&pool, "root", "Rae", None).await;

        let cookie = session_cookie_for(&server, "root", "password-root").await;
        let response = server.get("/admin/api/v1/users").add_header("cookie", cookie).await;

        response.assert_status_ok();
        let users: Vec<serde_json::Value> = response.json();
        assert_eq!(users.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn create_user_requires_session(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let response = server
            .post("/admin/api/v1/users")
            .json(&serde_json::json!({"name": "Ann", "group": null}))
            .await;

        response.assert_status_unauthorized();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn create_user_rejects_blank_name(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;

        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;
        let response = server
            .post("/admin/api/v1/users")
            .add_header("cookie", cookie)
            .json(&serde_json::json!({"name": "   ", "group": "A"}))
            .await;

        response.assert_status_bad_request();
    }
}
