//! Date predicate parsing and matching for the time primaries.
//!
//! Days are UTC days, matching how stat timestamps are decoded.
//!
//! ## Supported Syntax
//!
//! - Keywords: `today`, `yesterday`, `thisweek`, `lastweek`, `pastweek`,
//!   `thismonth`, `lastmonth`, `pastmonth`, `thisyear`, `lastyear`, `pastyear`
//! - Absolute dates: `YYYY-MM-DD`, `DD-MM-YYYY`, `MM-DD-YYYY`, with `-`, `/`
//!   or `.` as separator
//! - Comparisons: `<`, `<=`, `>`, `>=`, `=`, `!=` followed by a date
//! - Ranges: `2024-01-01..2024-12-31`, `..2024-12-31`, `2024-01-01..`

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::error::{Result, VolumeError};

use super::compare::{split_comparison, split_range, within, CompareOp};
use super::predicate::TimePredicate;

/// A parsed date predicate over Unix timestamps (seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePredicate {
    /// Inclusive bounds.
    Range { start: Option<i64>, end: Option<i64> },
    /// Outside of the given day span.
    Outside { start: i64, end: i64 },
}

/// First and last second of a span of whole days.
#[derive(Debug, Clone, Copy)]
struct DaySpan {
    start: i64,
    end: i64,
}

impl DatePredicate {
    /// Parses relative to the current UTC date.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_relative_to(raw, Utc::now().date_naive())
    }

    /// Parses with keywords such as `today` resolved against `today`.
    pub fn parse_relative_to(raw: &str, today: NaiveDate) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(VolumeError::QueryParse(
                "date filter requires a value".to_string(),
            ));
        }

        if let Some((op, value)) = split_comparison(trimmed) {
            let span = parse_date_value(value, today)?;
            return Ok(match op {
                CompareOp::Lt => Self::range(None, Some(span.start.saturating_sub(1))),
                CompareOp::Lte => Self::range(None, Some(span.end)),
                CompareOp::Gt => Self::range(Some(span.end.saturating_add(1)), None),
                CompareOp::Gte => Self::range(Some(span.start), None),
                CompareOp::Eq => Self::range(Some(span.start), Some(span.end)),
                CompareOp::Ne => Self::Outside {
                    start: span.start,
                    end: span.end,
                },
            });
        }

        if let Some((start_raw, end_raw)) = split_range(trimmed) {
            let start = if start_raw.is_empty() {
                None
            } else {
                Some(parse_date_value(start_raw, today)?.start)
            };
            let end = if end_raw.is_empty() {
                None
            } else {
                Some(parse_date_value(end_raw, today)?.end)
            };
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    return Err(VolumeError::QueryParse(
                        "date range start must be before or equal to end".to_string(),
                    ));
                }
            }
            return Ok(Self::range(start, end));
        }

        let span = parse_date_value(trimmed, today)?;
        Ok(Self::range(Some(span.start), Some(span.end)))
    }

    fn range(start: Option<i64>, end: Option<i64>) -> Self {
        Self::Range { start, end }
    }

    /// Checks a Unix timestamp in seconds.
    pub fn matches(&self, timestamp: i64) -> bool {
        match *self {
            Self::Range { start, end } => within(timestamp, start, end),
            Self::Outside { start, end } => timestamp < start || timestamp > end,
        }
    }
}

impl TimePredicate for DatePredicate {
    fn eval_time(&self, value: DateTime<Utc>) -> bool {
        self.matches(value.timestamp())
    }
}

fn parse_date_value(raw: &str, today: NaiveDate) -> Result<DaySpan> {
    let trimmed = raw.trim();
    keyword_span(trimmed, today)
        .or_else(|| parse_absolute_date(trimmed).map(|date| days(date, date)))
        .ok_or_else(|| VolumeError::QueryParse(format!("unrecognized date value: {raw:?}")))
}

fn keyword_span(keyword: &str, today: NaiveDate) -> Option<DaySpan> {
    let (year, month) = (today.year(), today.month());
    match keyword.to_ascii_lowercase().as_str() {
        "today" => Some(days(today, today)),
        "yesterday" => {
            let date = today.checked_sub_signed(Duration::days(1))?;
            Some(days(date, date))
        }
        "thisweek" => week_span(today, 0),
        "lastweek" => week_span(today, 1),
        "thismonth" => month_span(year, month),
        "lastmonth" => {
            if month == 1 {
                month_span(year.checked_sub(1)?, 12)
            } else {
                month_span(year, month - 1)
            }
        }
        "thisyear" => year_span(year),
        "lastyear" => year_span(year.checked_sub(1)?),
        "pastweek" => trailing_span(today, 7),
        "pastmonth" => trailing_span(today, 30),
        "pastyear" => trailing_span(today, 365),
        _ => None,
    }
}

fn days(first: NaiveDate, last: NaiveDate) -> DaySpan {
    let start = first
        .and_hms_opt(0, 0, 0)
        .map_or(i64::MIN, |dt| dt.and_utc().timestamp());
    let end = last
        .and_hms_opt(23, 59, 59)
        .map_or(i64::MAX, |dt| dt.and_utc().timestamp());
    DaySpan { start, end }
}

/// Monday-based week, `weeks_back` weeks before the current one.
fn week_span(today: NaiveDate, weeks_back: i64) -> Option<DaySpan> {
    let offset = i64::from(today.weekday().num_days_from_monday()) + 7 * weeks_back;
    let monday = today.checked_sub_signed(Duration::days(offset))?;
    let sunday = monday.checked_add_signed(Duration::days(6))?;
    Some(days(monday, sunday))
}

fn month_span(year: i32, month: u32) -> Option<DaySpan> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month)?)?;
    Some(days(first, last))
}

fn year_span(year: i32) -> Option<DaySpan> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some(days(first, last))
}

/// The last `count` days, today included.
fn trailing_span(today: NaiveDate, count: i64) -> Option<DaySpan> {
    let first = today.checked_sub_signed(Duration::days(count - 1))?;
    Some(days(first, today))
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.pred_opt()?.day())
}

fn parse_absolute_date(raw: &str) -> Option<NaiveDate> {
    let separator = raw.chars().find(|ch| matches!(ch, '-' | '/' | '.'))?;
    let year_first = raw
        .get(..4)
        .is_some_and(|head| head.chars().all(|ch| ch.is_ascii_digit()));
    let layouts: &[[&str; 3]] = if year_first {
        &[["%Y", "%m", "%d"]]
    } else {
        &[["%d", "%m", "%Y"], ["%m", "%d", "%Y"], ["%Y", "%m", "%d"]]
    };
    layouts.iter().find_map(|parts| {
        let format = parts.join(&separator.to_string());
        NaiveDate::parse_from_str(raw, &format).ok()
    })
}
