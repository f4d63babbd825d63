//! API models for monthly completion reports.

use crate::reporting::CompletionReport;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Monthly report query parameters.
///
/// Lenient on purpose: missing or unparseable values fall back to the
/// current year and month, matching how the dashboard treats its inputs.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl ReportQuery {
    /// Resolve to a concrete (year, month), falling back per-field to
    /// `today`. A month outside 1-12 also falls back.
    pub fn resolve(&self, today: chrono::NaiveDate) -> (i32, u32) {
        use chrono::Datelike;

        let year = self
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<i32>().ok())
            .unwrap_or_else(|| today.year());
        let month = self
            .month
            .as_deref()
            .and_then(|m| m.trim().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .unwrap_or_else(|| today.month());

        (year, month)
    }
}

/// The monthly report plus the window it was computed over.
///
/// `window` may be shorter than the calendar month: days before the system
/// start date and days that have not closed yet are clipped out. An empty
/// window is valid and yields undefined rates.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyReportResponse {
    pub year: i32,
    pub month: u32,
    pub window: Vec<NaiveDate>,
    #[serde(flatten)]
    pub report: CompletionReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn missing_params_fall_back_to_today() {
        let query = ReportQuery::default();
        assert_eq!(query.resolve(today()), (2025, 6));
    }

    #[test]
    fn valid_params_are_used() {
        let query = ReportQuery {
            year: Some("2024".to_string()),
            month: Some("11".to_string()),
        };
        assert_eq!(query.resolve(today()), (2024, 11));
    }

    #[test]
    fn unparseable_fields_fall_back_independently() {
        let query = ReportQuery {
            year: Some("twenty".to_string()),
            month: Some("3".to_string()),
        };
        assert_eq!(query.resolve(today()), (2025, 3));
    }

    #[test]
    fn out_of_range_month_falls_back() {
        let query = ReportQuery {
            year: Some("2024".to_string()),
            month: Some("13".to_string()),
        };
        assert_eq!(query.resolve(today()), (2024, 6));
    }
}
