use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{
        admins::{AdminResponse, CurrentAdmin},
        auth::{AuthResponse, AuthSuccessResponse, LoginRequest, LoginResponse, LogoutResponse},
    },
    auth::{password, session},
    db::handlers::Admins,
    errors::Error,
};

/// Login with account id and password
#[utoipa::path(
    post,
    path = "/authentication/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut admin_repo = Admins::new(&mut pool_conn);

    let admin = admin_repo
        .get_by_account_id(&request.account_id)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Invalid account or password".to_string()),
        })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = admin.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Invalid account or password".to_string()),
        });
    }

    let current_admin = CurrentAdmin {
        account_id: admin.account_id.clone(),
        name: admin.name.clone(),
        role: admin.role,
    };
    let token = session::create_session_token(&current_admin, &state.config)?;
    let cookie = create_session_cookie(&token, &state.config);

    let auth_response = AuthResponse {
        admin: AdminResponse::from(admin),
        message: "Login successful".to_string(),
    };

    Ok(LoginResponse { auth_response, cookie })
}

/// Logout (clear session)
#[utoipa::path(
    post,
    path = "/authentication/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse, Error> {
    // Create expired cookie to clear session
    let cookie = format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0",
        state.config.auth.session.cookie_name
    );

    let auth_response = AuthSuccessResponse {
        message: "Logout successful".to_string(),
    };

    Ok(LogoutResponse { auth_response, cookie })
}

fn create_session_cookie(token: &str, config: &crate::config::Config) -> String {
    let session_config = &config.auth.session;
    let max_age = session_config.timeout.as_secs();

    format!(
        "{}={}; Path=/; HttpOnly; Secure={}; SameSite={}; Max-Age={}",
        session_config.cookie_name, token, session_config.cookie_secure, session_config.cookie_same_site, max_age
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::admins::Role;
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[test]
    fn session_cookie_carries_token_and_attributes() {
        let config = create_test_config();
        let cookie = create_session_cookie("tok123", &config);
        assert!(cookie.starts_with("taskdeck_session=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=43200"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn login_sets_session_cookie(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "lead", "hunter2hunter2", Role::Admin).await;

        let response = server
            .post("/authentication/login")
            .json(&serde_json::json!({"account_id": "lead", "password": "hunter2hunter2"}))
            .await;

        response.assert_status_ok();
        let set_cookie = response.header("set-cookie");
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with("taskdeck_session="));

        let body: serde_json::Value = response.json();
        assert_eq!(body["admin"]["account_id"], "lead");
        assert_eq!(body["admin"]["role"], "admin");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn login_rejects_wrong_password(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "lead", "hunter2hunter2", Role::Admin).await;

        let response = server
            .post("/authentication/login")
            .json(&serde_json::json!({"account_id": "lead", "password": "wrong"}))
            .await;

        response.assert_status_unauthorized();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn login_rejects_unknown_account(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let response = server
            .post("/authentication/login")
            .json(&serde_json::json!({"account_id": "ghost", "password": "whatever"}))
            .await;

        response.assert_status_unauthorized();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn logout_clears_cookie(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let response = server.post("/authentication/logout").await;
        response.assert_status_ok();
        let set_cookie = response.header("set-cookie");
        assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}
