//! API models for the dashboard grid.

use crate::types::{StatusCode, TaskId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

/// Dashboard query parameters.
///
/// Both are optional: a missing view means the week grid, while unknown view
/// tags fall back to `day` rather than failing. The anchor defaults to today.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Window shape: "day", "week" or "month"
    pub view: Option<String>,
    /// Date the window is derived from (defaults to today)
    pub anchor: Option<NaiveDate>,
}

/// One task row in the grid, with its stored statuses for the window.
/// Days with no stored record are absent from the map (pending).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardTask {
    pub id: TaskId,
    pub name: String,
    pub statuses: HashMap<NaiveDate, StatusCode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardUser {
    pub id: UserId,
    pub name: String,
    pub tasks: Vec<DashboardTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardGroup {
    pub name: String,
    pub users: Vec<DashboardUser>,
}

/// The rendered dashboard window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Resolved view tag ("day", "week" or "month")
    pub view: String,
    /// The days of the window, in order
    pub days: Vec<NaiveDate>,
    /// Anchor for the previous window
    pub prev: NaiveDate,
    /// Anchor for the next window
    pub next: NaiveDate,
    /// Users grouped by group label, in first-appearance order
    pub groups: Vec<DashboardGroup>,
}
