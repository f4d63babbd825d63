//! Calendar window generation for the dashboard and report views.
//!
//! A window is the ordered set of calendar dates a view covers, together
//! with the anchor dates of the adjacent windows. Everything here is a pure
//! function of (reference date, view mode); no I/O, no clock access.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// View granularity for the dashboard grid.
///
/// Unrecognized tags fall back to [`ViewMode::Day`], so a mistyped query
/// parameter degrades to the narrowest view instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

impl FromStr for ViewMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "week" => ViewMode::Week,
            "month" => ViewMode::Month,
            _ => ViewMode::Day,
        })
    }
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }
}

/// An ordered date window plus the anchors of the previous and next windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    /// Ascending dates covered by the window.
    pub days: Vec<NaiveDate>,
    /// Anchor of the previous window (pass back as the `anchor` query parameter).
    pub prev: NaiveDate,
    /// Anchor of the next window.
    pub next: NaiveDate,
}

impl CalendarWindow {
    /// Build the window containing `reference` for the given view mode.
    ///
    /// - `day`: the reference date alone; prev/next are the adjacent days.
    /// - `week`: seven days starting from the preceding (or same) Sunday;
    ///   prev/next are the starts of the adjacent weeks.
    /// - `month`: every day of the reference's calendar month; prev/next are
    ///   the first days of the adjacent months.
    pub fn for_view(reference: NaiveDate, mode: ViewMode) -> Self {
        match mode {
            ViewMode::Day => Self {
                days: vec![reference],
                prev: reference - Days::new(1),
                next: reference + Days::new(1),
            },
            ViewMode::Week => {
                let start = reference - Days::new(u64::from(reference.weekday().num_days_from_sunday()));
                Self {
                    days: (0..7).map(|i| start + Days::new(i)).collect(),
                    prev: start - Days::new(7),
                    next: start + Days::new(7),
                }
            }
            ViewMode::Month => {
                let first = reference.with_day(1).expect("day 1 is valid for every month");
                let next = first_of_next_month(first);
                let days = first.iter_days().take_while(|d| *d < next).collect();
                Self {
                    days,
                    prev: first_of_prev_month(first),
                    next,
                }
            }
        }
    }

    /// First and last date of the window, if non-empty.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.days.first()?, *self.days.last()?))
    }
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}

fn first_of_prev_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn day_window_is_single_date_with_adjacent_anchors() {
        let w = CalendarWindow::for_view(d(2026, 8, 26), ViewMode::Day);
        assert_eq!(w.days, vec![d(2026, 8, 26)]);
        assert_eq!(w.prev, d(2026, 8, 25));
        assert_eq!(w.next, d(2026, 8, 27));
    }

    #[test]
    fn week_window_starts_on_preceding_sunday() {
        // 2026-08-26 is a Wednesday; the week should start on Sunday 08-23.
        let w = CalendarWindow::for_view(d(2026, 8, 26), ViewMode::Week);
        assert_eq!(w.days.len(), 7);
        assert_eq!(w.days[0], d(2026, 8, 23));
        assert_eq!(w.days[6], d(2026, 8, 29));
        assert_eq!(w.prev, d(2026, 8, 16));
        assert_eq!(w.next, d(2026, 8, 30));
    }

    #[test]
    fn week_window_anchored_on_sunday_starts_same_day() {
        let w = CalendarWindow::for_view(d(2026, 8, 23), ViewMode::Week);
        assert_eq!(w.days[0], d(2026, 8, 23));
        assert_eq!(w.prev, d(2026, 8, 16));
        assert_eq!(w.next, d(2026, 8, 30));
    }

    #[test]
    fn month_window_covers_whole_month() {
        let w = CalendarWindow::for_view(d(2026, 8, 15), ViewMode::Month);
        assert_eq!(w.days.len(), 31);
        assert_eq!(w.days[0], d(2026, 8, 1));
        assert_eq!(w.days[30], d(2026, 8, 31));
        assert_eq!(w.prev, d(2026, 7, 1));
        assert_eq!(w.next, d(2026, 9, 1));
    }

    #[test]
    fn leap_year_february_has_29_days() {
        let w = CalendarWindow::for_view(d(2028, 2, 10), ViewMode::Month);
        assert_eq!(w.days.len(), 29);
        assert_eq!(*w.days.last().unwrap(), d(2028, 2, 29));
    }

    #[test]
    fn month_anchors_wrap_across_year_boundaries() {
        let w = CalendarWindow::for_view(d(2026, 12, 31), ViewMode::Month);
        assert_eq!(w.prev, d(2026, 11, 1));
        assert_eq!(w.next, d(2027, 1, 1));

        let w = CalendarWindow::for_view(d(2026, 1, 1), ViewMode::Month);
        assert_eq!(w.prev, d(2025, 12, 1));
        assert_eq!(w.next, d(2026, 2, 1));
    }

    #[test]
    fn unknown_view_tag_falls_back_to_day() {
        assert_eq!("week".parse::<ViewMode>().unwrap(), ViewMode::Week);
        assert_eq!("month".parse::<ViewMode>().unwrap(), ViewMode::Month);
        assert_eq!("fortnight".parse::<ViewMode>().unwrap(), ViewMode::Day);
        assert_eq!("".parse::<ViewMode>().unwrap(), ViewMode::Day);
    }
}
