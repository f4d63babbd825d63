//! OpenAPI documentation for the management API.

use utoipa::OpenApi;

use crate::api::models::{
    admins::{AdminResponse, CurrentAdmin, Role},
    auth::{AuthResponse, AuthSuccessResponse, LoginRequest},
    dashboard::{DashboardGroup, DashboardResponse, DashboardTask, DashboardUser},
    reports::MonthlyReportResponse,
    statuses::{BatchStatusResponse, StatusResponse, StatusUpdate},
    tasks::{GenerateTasksResponse, TaskCreate, TaskResponse, TemplateCreate, TemplateResponse},
    users::{UserCreate, UserResponse},
};
use crate::reporting::{CompletionReport, GroupReport, GroupTaskReport, OverallSummary, StatusCounts, TaskReport, UserReport};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::logout,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::create_user,
        crate::api::handlers::tasks::list_user_tasks,
        crate::api::handlers::tasks::create_user_task,
        crate::api::handlers::tasks::list_templates,
        crate::api::handlers::tasks::create_template,
        crate::api::handlers::tasks::generate_tasks,
        crate::api::handlers::statuses::update_status,
        crate::api::handlers::statuses::update_statuses_batch,
        crate::api::handlers::dashboard::get_dashboard,
        crate::api::handlers::reports::monthly_report,
    ),
    components(schemas(
        Role,
        CurrentAdmin,
        AdminResponse,
        LoginRequest,
        AuthResponse,
        AuthSuccessResponse,
        UserCreate,
        UserResponse,
        TaskCreate,
        TaskResponse,
        TemplateCreate,
        TemplateResponse,
        GenerateTasksResponse,
        StatusUpdate,
        StatusResponse,
        BatchStatusResponse,
        DashboardResponse,
        DashboardGroup,
        DashboardUser,
        DashboardTask,
        MonthlyReportResponse,
        CompletionReport,
        UserReport,
        TaskReport,
        GroupReport,
        GroupTaskReport,
        OverallSummary,
        StatusCounts,
    )),
    tags(
        (name = "authentication", description = "Administrator sessions"),
        (name = "users", description = "User roster management"),
        (name = "tasks", description = "Tasks and the template catalog"),
        (name = "statuses", description = "Daily status recording"),
        (name = "dashboard", description = "Status grid views"),
        (name = "reports", description = "Completion-rate reports"),
    )
)]
pub struct ApiDoc;
