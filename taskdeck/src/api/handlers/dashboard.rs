use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use std::collections::HashMap;

use crate::{
    AppState,
    api::{
        handlers::users::scope_filter,
        models::{
            admins::CurrentAdmin,
            dashboard::{DashboardGroup, DashboardQuery, DashboardResponse, DashboardTask, DashboardUser},
        },
    },
    calendar::{CalendarWindow, ViewMode},
    db::handlers::{Repository, Statuses, Tasks, Users},
    errors::Error,
    reporting::group_users,
    types::TaskId,
};

/// Render the status grid for a day, week or month window
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard grid", body = DashboardResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, Error> {
    // An absent view means the week grid; unknown tags fall back to the day
    // view via the infallible parse.
    let mode: ViewMode = match query.view.as_deref() {
        Some(tag) => tag.parse().unwrap_or(ViewMode::Day),
        None => ViewMode::Week,
    };
    let anchor = query.anchor.unwrap_or_else(|| Utc::now().date_naive());
    let window = CalendarWindow::for_view(anchor, mode);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mut user_repo = Users::new(&mut conn);
    let users = user_repo.list(&scope_filter(&admin)).await?;

    let user_ids: Vec<_> = users.iter().map(|u| u.id).collect();
    let mut task_repo = Tasks::new(&mut conn);
    let tasks = task_repo.list_for_users(&user_ids).await?;

    let task_ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
    let mut status_repo = Statuses::new(&mut conn);
    let statuses = status_repo.get_for_tasks(&task_ids, window.bounds()).await?;

    let mut tasks_by_user: HashMap<_, Vec<_>> = HashMap::new();
    for task in tasks {
        tasks_by_user.entry(task.user_id).or_default().push(task);
    }

    let groups = group_users(&users, &state.config.fallback_group)
        .into_iter()
        .map(|(name, members)| DashboardGroup {
            name,
            users: members
                .into_iter()
                .map(|user| DashboardUser {
                    id: user.id,
                    name: user.name.clone(),
                    tasks: tasks_by_user
                        .get(&user.id)
                        .map(Vec::as_slice)
                        .unwrap_or(&[])
                        .iter()
                        .map(|task| DashboardTask {
                            id: task.id,
                            name: task.name.clone(),
                            statuses: statuses.get(&task.id).cloned().unwrap_or_default(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(Json(DashboardResponse {
        view: mode.as_str().to_string(),
        days: window.days.clone(),
        prev: window.prev,
        next: window.next,
        groups,
    }))
}
