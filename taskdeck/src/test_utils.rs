//! Shared helpers for integration-style handler tests.
//!
//! These operate directly on the pool provided by `#[sqlx::test]`, which has
//! already applied the crate's migrations.

use crate::{
    AppState, Config, build_router,
    api::models::admins::Role,
    auth::password,
    db::models::{admins::AdminDBResponse, tasks::TaskDBResponse, users::UserDBResponse},
    types::{TaskId, UserId},
};
use axum_test::TestServer;
use chrono::NaiveDate;
use sqlx::PgPool;

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key-for-jwt".to_string()),
        ..Default::default()
    }
}

/// Build a test server over the full router, sharing the given pool.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let state = AppState {
        db: pool,
        config: create_test_config(),
    };
    let router = build_router(state).expect("router should build");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

pub async fn create_test_admin(pool: &PgPool, account_id: &str, password: &str, role: Role) -> AdminDBResponse {
    let password_hash = password::hash_password(password).expect("hashing should succeed");
    sqlx::query_as::<_, AdminDBResponse>(
        r#"
        INSERT INTO admins (account_id, name, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING account_id, name, password_hash, role, created_at
        "#,
    )
    .bind(account_id)
    .bind(format!("{account_id} admin"))
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("admin insert should succeed")
}

pub async fn create_test_user(pool: &PgPool, admin_id: &str, name: &str, group: Option<&str>) -> UserDBResponse {
    sqlx::query_as::<_, UserDBResponse>(
        r#"
        INSERT INTO users (name, group_name, admin_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, group_name, admin_id
        "#,
    )
    .bind(name)
    .bind(group)
    .bind(admin_id)
    .fetch_one(pool)
    .await
    .expect("user insert should succeed")
}

pub async fn create_test_task(pool: &PgPool, user_id: UserId, name: &str) -> TaskDBResponse {
    sqlx::query_as::<_, TaskDBResponse>("INSERT INTO tasks (user_id, name) VALUES ($1, $2) RETURNING id, user_id, name")
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("task insert should succeed")
}

pub async fn set_test_status(pool: &PgPool, task_id: TaskId, date: &str, status: i16) {
    let date: NaiveDate = date.parse().expect("test date should parse");
    sqlx::query(
        r#"
        INSERT INTO task_statuses (user_id, task_id, date, status)
        SELECT t.user_id, t.id, $2, $3 FROM tasks t WHERE t.id = $1
        ON CONFLICT (task_id, date) DO UPDATE SET status = EXCLUDED.status
        "#,
    )
    .bind(task_id)
    .bind(date)
    .bind(status)
    .execute(pool)
    .await
    .expect("status insert should succeed");
}

/// Login through the API and return the session cookie pair for reuse.
pub async fn session_cookie_for(server: &TestServer, account_id: &str, password: &str) -> String {
    let response = server
        .post("/authentication/login")
        .json(&serde_json::json!({"account_id": account_id, "password": password}))
        .await;
    response.assert_status_ok();

    let set_cookie = response.header("set-cookie");
    set_cookie
        .to_str()
        .expect("cookie should be ascii")
        .split(';')
        .next()
        .expect("cookie should have a name=value pair")
        .to_string()
}
