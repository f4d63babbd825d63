//! # taskdeck: Multi-Tenant Task Tracking Dashboard
//!
//! `taskdeck` is a management service for teams that track daily recurring
//! tasks. Administrators maintain a roster of tracked users, assign tasks
//! from a shared template catalog, and record a status for each task-day:
//! pending, completed, rest, or not applicable. The service renders the
//! stored statuses as day/week/month dashboard grids and computes monthly
//! completion-rate reports per task, user, and group.
//!
//! ## Overview
//!
//! The system is multi-tenant at the administrator level: a regular
//! administrator sees only the users they created, while a super
//! administrator sees everyone. Users do not log in; they are rows managed
//! on their administrator's behalf.
//!
//! Completion rates treat "rest" days as excused (removed from the
//! denominator) and "not applicable" days as credited (counted in the
//! numerator). A window where every day is excused yields an explicit
//! "undefined" rate rather than a misleading percentage. The pure
//! aggregation logic lives in [`reporting`], the window math in
//! [`calendar`].
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for all persistence. Browser clients
//! authenticate with a JWT session cookie obtained from
//! `/authentication/login`; every management route under `/admin/api/v1/*`
//! requires it. The **database layer** ([`db`]) uses the repository pattern:
//! each table has a repository that encapsulates its queries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use taskdeck::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = taskdeck::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     taskdeck::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires a PostgreSQL database and automatically runs
//! migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! taskdeck::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod reporting;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::{
    auth::password,
    db::{handlers::Admins, models::admins::AdminCreateDBRequest},
    openapi::ApiDoc,
};
use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{get, post},
};
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the taskdeck database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial super admin account if it doesn't exist.
///
/// Idempotent: an existing account with the configured id is left untouched,
/// so startup never overwrites a rotated password. Typically called during
/// application startup so there is always a way in.
#[instrument(skip_all)]
pub async fn create_initial_admin(config: &Config, db: &PgPool) -> anyhow::Result<()> {
    let Some(admin_password) = config.admin_password.as_deref() else {
        info!("No admin_password configured, skipping initial admin creation");
        return Ok(());
    };

    let password_hash = password::hash_password(admin_password)?;

    let mut conn = db.acquire().await?;
    let mut admin_repo = Admins::new(&mut conn);
    let created = admin_repo
        .create_if_absent(&AdminCreateDBRequest {
            account_id: config.admin_account.clone(),
            name: config.admin_name.clone(),
            password_hash,
            role: api::models::admins::Role::SuperAdmin,
        })
        .await?;

    if created {
        info!("Created initial admin account '{}'", config.admin_account);
    }

    Ok(())
}

/// Connect to the database, run migrations, and seed the initial admin.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPool::connect(&config.database_url).await?;
    migrator().run(&pool).await?;

    create_initial_admin(config, &pool).await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Authentication routes at root level
    let auth_routes = Router::new()
        .route("/authentication/login", post(api::handlers::auth::login))
        .route("/authentication/logout", post(api::handlers::auth::logout))
        .with_state(state.clone());

    // Management API routes
    let api_routes = Router::new()
        .route("/dashboard", get(api::handlers::dashboard::get_dashboard))
        .route("/users", get(api::handlers::users::list_users))
        .route("/users", post(api::handlers::users::create_user))
        .route("/users/{user_id}/tasks", get(api::handlers::tasks::list_user_tasks))
        .route("/users/{user_id}/tasks", post(api::handlers::tasks::create_user_task))
        .route("/task-templates", get(api::handlers::tasks::list_templates))
        .route("/task-templates", post(api::handlers::tasks::create_template))
        .route("/tasks/generate", post(api::handlers::tasks::generate_tasks))
        .route("/statuses", post(api::handlers::statuses::update_status))
        .route("/statuses/batch", post(api::handlers::statuses::update_statuses_batch))
        .route("/reports/monthly", get(api::handlers::reports::monthly_report))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(auth_routes)
        .nest("/admin/api/v1", api_routes)
        .merge(Scalar::with_url("/admin/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
            .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and seeds the initial admin account
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = setup_database(&config).await?;

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
        };
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "taskdeck listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
