use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Days, NaiveDate, Utc};

use crate::{
    AppState,
    api::{
        handlers::users::scope_filter,
        models::{
            admins::CurrentAdmin,
            reports::{MonthlyReportResponse, ReportQuery},
        },
    },
    config::ReportingConfig,
    db::handlers::{Repository, Statuses, Tasks, Users},
    errors::Error,
    reporting::build_report,
    types::TaskId,
};

/// The days of `(year, month)` that are eligible for reporting, in order.
///
/// Clips to the system start date at the front. At the back the window stops
/// at today: either inclusive or exclusive of the current day, depending on
/// configuration. Future months come out empty.
fn report_window(year: i32, month: u32, today: NaiveDate, reporting: &ReportingConfig) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = match first.checked_add_months(chrono::Months::new(1)) {
        Some(next) => next.pred_opt().unwrap_or(first),
        None => return Vec::new(),
    };

    let start = first.max(reporting.start_date);
    let cutoff = if reporting.include_current_day {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) => yesterday,
            None => return Vec::new(),
        }
    };
    let end = last.min(cutoff);

    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Monthly completion report for the users in scope
#[utoipa::path(
    get,
    path = "/reports/monthly",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Monthly completion report", body = MonthlyReportResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %admin.account_id))]
pub async fn monthly_report(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Query(query): Query<ReportQuery>,
) -> Result<Json<MonthlyReportResponse>, Error> {
    let today = Utc::now().date_naive();
    let (year, month) = query.resolve(today);
    let window = report_window(year, month, today, &state.config.reporting);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mut user_repo = Users::new(&mut conn);
    let users = user_repo.list(&scope_filter(&admin)).await?;

    let user_ids: Vec<_> = users.iter().map(|u| u.id).collect();
    let mut task_repo = Tasks::new(&mut conn);
    let tasks = task_repo.list_for_users(&user_ids).await?;

    let task_ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
    let mut status_repo = Statuses::new(&mut conn);
    let statuses = match (window.first(), window.last()) {
        (Some(&from), Some(&to)) => status_repo.get_for_tasks(&task_ids, Some((from, to))).await?,
        _ => Default::default(),
    };

    let report = build_report(&users, &tasks, &window, &statuses, &state.config.fallback_group);

    Ok(Json(MonthlyReportResponse {
        year,
        month,
        window,
        report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::admins::Role;
    use crate::test_utils::*;
    use sqlx::PgPool;

    fn reporting(start: (i32, u32, u32), include_current_day: bool) -> ReportingConfig {
        ReportingConfig {
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            include_current_day,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn closed_month_covers_every_day() {
        let window = report_window(2025, 4, d(2025, 6, 15), &reporting((2024, 1, 1), false));
        assert_eq!(window.len(), 30);
        assert_eq!(window[0], d(2025, 4, 1));
        assert_eq!(window[29], d(2025, 4, 30));
    }

    #[test]
    fn current_month_excludes_today_by_default() {
        let window = report_window(2025, 6, d(2025, 6, 15), &reporting((2024, 1, 1), false));
        assert_eq!(window.last().copied(), Some(d(2025, 6, 14)));
    }

    #[test]
    fn current_month_includes_today_when_configured() {
        let window = report_window(2025, 6, d(2025, 6, 15), &reporting((2024, 1, 1), true));
        assert_eq!(window.last().copied(), Some(d(2025, 6, 15)));
    }

    #[test]
    fn start_date_clips_the_front() {
        let window = report_window(2025, 6, d(2025, 7, 15), &reporting((2025, 6, 10), false));
        assert_eq!(window.first().copied(), Some(d(2025, 6, 10)));
        assert_eq!(window.last().copied(), Some(d(2025, 6, 30)));
    }

    #[test]
    fn future_month_is_empty() {
        let window = report_window(2025, 7, d(2025, 6, 15), &reporting((2024, 1, 1), false));
        assert!(window.is_empty());
    }

    #[test]
    fn month_before_start_date_is_empty() {
        let window = report_window(2024, 12, d(2025, 6, 15), &reporting((2025, 1, 1), false));
        assert!(window.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn report_aggregates_stored_statuses(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;
        let user = create_test_user(&pool, "alpha", "Ann", Some("A")).await;
        let task = create_test_task(&pool, user.id, "review").await;

        // A closed month in the past relative to any test run date.
        set_test_status(&pool, task.id, "2025-04-01", 1).await;
        set_test_status(&pool, task.id, "2025-04-02", 2).await;

        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;
        let response = server
            .get("/admin/api/v1/reports/monthly")
            .add_query_param("year", "2025")
            .add_query_param("month", "4")
            .add_header("cookie", cookie)
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["year"], 2025);
        assert_eq!(body["month"], 4);
        assert_eq!(body["window"].as_array().unwrap().len(), 30);

        let ann = &body["users"][0];
        assert_eq!(ann["completed"], 1);
        assert_eq!(ann["rest"], 1);
        assert_eq!(ann["total_days"], 30);
        // 1 completed out of 29 eligible days -> 3.4%
        assert_eq!(ann["rate"], 3.4);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn lenient_params_fall_back_to_current_month(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_admin(&pool, "alpha", "password-alpha", Role::Admin).await;

        let cookie = session_cookie_for(&server, "alpha", "password-alpha").await;
        let response = server
            .get("/admin/api/v1/reports/monthly")
            .add_query_param("year", "not-a-year")
            .add_query_param("month", "99")
            .add_header("cookie", cookie)
            .await;

        response.assert_status_ok();
        let today = chrono::Utc::now().date_naive();
        let body: serde_json::Value = response.json();
        assert_eq!(body["year"], chrono::Datelike::year(&today));
        assert_eq!(body["month"], chrono::Datelike::month(&today));
    }
}
