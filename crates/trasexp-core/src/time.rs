//! Date parsing and inclusive date windows for filtering transactions

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Parse a transaction timestamp.
///
/// Accepts a bare `YYYY-MM-DD` date (midnight), ISO date-times with or
/// without fractional seconds, and RFC 3339 strings, whose local wall-clock
/// time is kept.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.naive_local())
        .ok()
}

/// Parse a calendar date, ignoring any time part
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|ts| ts.date())
}

/// Last representable millisecond of a day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Whether a date falls in the given calendar month
pub fn in_month(date: NaiveDate, month: u32, year: i32) -> bool {
    date.month() == month && date.year() == year
}

/// Inclusive calendar window. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Check a timestamp against the window.
    ///
    /// The lower bound starts at midnight and the upper bound ends at
    /// 23:59:59.999 of its day.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        if let Some(from) = self.from {
            if *ts < from.and_time(NaiveTime::MIN) {
                return false;
            }
        }
        if let Some(to) = self.to {
            if *ts > end_of_day(to) {
                return false;
            }
        }
        true
    }

    /// Human-readable description of the window
    pub fn description(&self) -> String {
        match (self.from, self.to) {
            (None, None) => "All Time".to_string(),
            (Some(from), None) => format!("From {}", from),
            (None, Some(to)) => format!("Until {}", to),
            (Some(from), Some(to)) => format!("{} to {}", from, to),
        }
    }
}
