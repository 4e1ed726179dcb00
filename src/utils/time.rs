//! Date helpers
//!
//! All timestamps leave the router as UTC ISO-8601 strings with millisecond
//! precision (`2024-01-15T10:30:00.000Z`).

use chrono::{DateTime, Local, SecondsFormat, TimeDelta, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn format_iso(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `YYYY-MM-DD` of the UTC date
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn add_days(date: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    date + TimeDelta::days(days)
}

pub fn is_expired(date: DateTime<Utc>) -> bool {
    date < Utc::now()
}

/// Whole days between two instants, rounded up
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let millis = (b - a).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Whether the instant falls on the current local calendar day
pub fn is_today(date: DateTime<Utc>) -> bool {
    date.with_timezone(&Local).date_naive() == Local::now().date_naive()
}

/// UTC offset of the host's local timezone, e.g. `+02:00`
pub fn local_timezone() -> String {
    Local::now().offset().to_string()
}
