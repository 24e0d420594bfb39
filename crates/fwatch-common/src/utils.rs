//! Shared formatting helpers.

use chrono::{DateTime, Duration, TimeZone};

/// Timestamp layout used in log lines, summaries and CSV rows.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats a duration as `H:MM:SS`, prefixed with `N day(s), ` past 24 hours.
///
/// Sub-second precision is dropped. Negative durations get a leading `-`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{sign}{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("{sign}1 day, {hours}:{minutes:02}:{seconds:02}"),
        n => format!("{sign}{n} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}

/// Formats an integer change with an explicit sign (`+5`, `-3`, `+0`).
pub fn format_signed(value: i64) -> String {
    format!("{value:+}")
}

/// Signed difference between two follower counts.
pub fn follower_delta(current: u64, previous: u64) -> i64 {
    if current >= previous {
        i64::try_from(current - previous).unwrap_or(i64::MAX)
    } else {
        i64::try_from(previous - current).map_or(i64::MIN, |d| -d)
    }
}
