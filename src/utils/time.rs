//! Calendar helpers for UTC day bucketing

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Midnight UTC at the start of `day`
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// ISO calendar date, e.g. `2024-03-01`
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Signed elapsed time from `from` to `to` in fractional minutes
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
