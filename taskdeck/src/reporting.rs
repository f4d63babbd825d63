//! Status aggregation and completion-rate reporting.
//!
//! This module is the reporting core: it folds per-day task statuses over a
//! date window into per-task, per-user, per-group and overall counters, and
//! derives completion rates from them. Everything is a pure function of its
//! inputs; the handlers fetch rows and hand them over.
//!
//! Rate rule: "rest" days are removed from the denominator entirely, and
//! "not applicable" days count as completed in the numerator. A window where
//! every day is rest or not-applicable has no eligible days and yields
//! [`Rate::Undefined`] instead of a misleading 0% or 100%.

use crate::db::models::{tasks::TaskDBResponse, users::UserDBResponse};
use crate::types::{StatusCode, TaskId, UserId};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Statuses keyed by task, then by date. Absent entries mean "not set".
pub type StatusMap = HashMap<TaskId, HashMap<NaiveDate, StatusCode>>;

/// Per-day classification of a raw status code.
///
/// Only 1, 2 and 3 are recognized; anything else (including 0 and legacy
/// out-of-range values) is treated as not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    NotSet,
    Completed,
    Rest,
    NotApplicable,
}

impl DayStatus {
    pub fn classify(code: StatusCode) -> Self {
        match code {
            1 => DayStatus::Completed,
            2 => DayStatus::Rest,
            3 => DayStatus::NotApplicable,
            _ => DayStatus::NotSet,
        }
    }
}

/// Completion rate over a window, in percent with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// No eligible days: every day in the window was rest or not-applicable.
    Undefined,
    Percent(f64),
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rate::Undefined => serializer.serialize_str("undefined"),
            Rate::Percent(p) => serializer.serialize_f64(*p),
        }
    }
}

/// Per-day status counters over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub completed: u32,
    pub rest: u32,
    pub not_applicable: u32,
    pub total_days: u32,
}

impl StatusCounts {
    /// Record one window day with the given classification.
    pub fn record(&mut self, status: DayStatus) {
        self.total_days += 1;
        match status {
            DayStatus::Completed => self.completed += 1,
            DayStatus::Rest => self.rest += 1,
            DayStatus::NotApplicable => self.not_applicable += 1,
            DayStatus::NotSet => {}
        }
    }

    /// Fold another counter into this one.
    pub fn merge(&mut self, other: &StatusCounts) {
        self.completed += other.completed;
        self.rest += other.rest;
        self.not_applicable += other.not_applicable;
        self.total_days += other.total_days;
    }

    /// Derive the completion rate.
    pub fn rate(&self) -> Rate {
        if self.rest + self.not_applicable == self.total_days {
            return Rate::Undefined;
        }
        let denom = i64::from(self.total_days) - i64::from(self.rest);
        if denom <= 0 {
            return Rate::Percent(0.0);
        }
        let raw = f64::from(self.completed + self.not_applicable) / denom as f64 * 100.0;
        Rate::Percent((raw * 10.0).round() / 10.0)
    }
}

/// Counts and rate for one task of one user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TaskReport {
    pub task_id: TaskId,
    pub task_name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
    #[schema(value_type = Option<f64>)]
    pub rate: Rate,
}

/// One user's tasks plus the summary across them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserReport {
    pub user_id: UserId,
    pub name: String,
    pub group: String,
    pub task_count: usize,
    pub tasks: Vec<TaskReport>,
    #[serde(flatten)]
    pub counts: StatusCounts,
    #[schema(value_type = Option<f64>)]
    pub rate: Rate,
}

/// Same task name performed by several users of a group, summed together.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupTaskReport {
    pub task_name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
    #[schema(value_type = Option<f64>)]
    pub rate: Rate,
}

/// Summary across all tasks of all users in a group, plus the per-task-name
/// cross-cut.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupReport {
    pub group: String,
    pub user_count: usize,
    pub tasks: Vec<GroupTaskReport>,
    #[serde(flatten)]
    pub counts: StatusCounts,
    #[schema(value_type = Option<f64>)]
    pub rate: Rate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverallSummary {
    #[serde(flatten)]
    pub counts: StatusCounts,
    #[schema(value_type = Option<f64>)]
    pub rate: Rate,
}

/// The full report for one window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletionReport {
    pub users: Vec<UserReport>,
    pub groups: Vec<GroupReport>,
    pub overall: OverallSummary,
}

/// Partition users into named groups, preserving each user's relative order.
///
/// Users with a null or empty group label land in the `fallback` bucket.
/// Group order follows first appearance in the input.
pub fn group_users<'a>(users: &'a [UserDBResponse], fallback: &str) -> Vec<(String, Vec<&'a UserDBResponse>)> {
    let mut order: Vec<(String, Vec<&UserDBResponse>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for user in users {
        let label = match user.group_name.as_deref() {
            Some(g) if !g.trim().is_empty() => g.to_string(),
            _ => fallback.to_string(),
        };
        match index.get(&label) {
            Some(&i) => order[i].1.push(user),
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, vec![user]));
            }
        }
    }

    order
}

/// Fold statuses over the window into the full report.
///
/// `tasks` must already be scoped to the permitted users; a task whose owner
/// is not in `users` is ignored. Single pass over tasks x window dates.
pub fn build_report(
    users: &[UserDBResponse],
    tasks: &[TaskDBResponse],
    window: &[NaiveDate],
    statuses: &StatusMap,
    fallback_group: &str,
) -> CompletionReport {
    let mut tasks_by_user: HashMap<UserId, Vec<&TaskDBResponse>> = HashMap::new();
    for task in tasks {
        tasks_by_user.entry(task.user_id).or_default().push(task);
    }

    let grouped = group_users(users, fallback_group);

    let mut user_reports = Vec::with_capacity(users.len());
    let mut group_reports = Vec::with_capacity(grouped.len());
    let mut overall = StatusCounts::default();

    for (group_label, members) in &grouped {
        let mut group_counts = StatusCounts::default();
        // Per-task-name cross-cut, in first-appearance order.
        let mut name_order: Vec<String> = Vec::new();
        let mut name_counts: HashMap<String, StatusCounts> = HashMap::new();

        for user in members {
            let user_tasks = tasks_by_user.get(&user.id).map(Vec::as_slice).unwrap_or(&[]);
            let mut user_counts = StatusCounts::default();
            let mut task_reports = Vec::with_capacity(user_tasks.len());

            for task in user_tasks {
                let task_statuses = statuses.get(&task.id);
                let mut counts = StatusCounts::default();
                for date in window {
                    let code = task_statuses.and_then(|m| m.get(date)).copied().unwrap_or(0);
                    counts.record(DayStatus::classify(code));
                }

                user_counts.merge(&counts);
                let slot = name_counts.entry(task.name.clone()).or_insert_with(|| {
                    name_order.push(task.name.clone());
                    StatusCounts::default()
                });
                slot.merge(&counts);

                task_reports.push(TaskReport {
                    task_id: task.id,
                    task_name: task.name.clone(),
                    counts,
                    rate: counts.rate(),
                });
            }

            group_counts.merge(&user_counts);
            user_reports.push(UserReport {
                user_id: user.id,
                name: user.name.clone(),
                group: group_label.clone(),
                task_count: task_reports.len(),
                tasks: task_reports,
                counts: user_counts,
                rate: user_counts.rate(),
            });
        }

        overall.merge(&group_counts);
        group_reports.push(GroupReport {
            group: group_label.clone(),
            user_count: members.len(),
            tasks: name_order
                .into_iter()
                .map(|name| {
                    let counts = name_counts[&name];
                    GroupTaskReport {
                        task_name: name,
                        counts,
                        rate: counts.rate(),
                    }
                })
                .collect(),
            counts: group_counts,
            rate: group_counts.rate(),
        });
    }

    CompletionReport {
        users: user_reports,
        groups: group_reports,
        overall: OverallSummary {
            counts: overall,
            rate: overall.rate(),
        },
    }
}
