//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/authentication/*`): Login and logout
//! - **Users** (`/admin/api/v1/users/*`): User roster and per-user tasks
//! - **Templates** (`/admin/api/v1/task-templates`): Shared task catalog
//! - **Statuses** (`/admin/api/v1/statuses*`): Single and batch status writes
//! - **Dashboard** (`/admin/api/v1/dashboard`): Day/week/month status grid
//! - **Reports** (`/admin/api/v1/reports/monthly`): Completion-rate reports
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/admin/docs` when the server is running.

pub mod handlers;
pub mod models;
