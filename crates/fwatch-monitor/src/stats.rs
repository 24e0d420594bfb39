//! Aggregate trend statistics over a finished series.

use crate::series::Series;
use chrono::{DateTime, Duration, Local};
use fwatch_common::{follower_delta, format_duration, format_signed, format_timestamp};
use std::fmt;

/// Trend between the anchor sample and the last sample of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummary {
    /// Timestamp of the anchor sample
    pub start: DateTime<Local>,
    /// Timestamp of the last sample
    pub end: DateTime<Local>,
    /// `end - start`
    pub duration: Duration,
    /// Last follower count minus the anchor's
    pub total_change: i64,
    /// Average change per minute, 0 when the duration is not positive
    pub rate_per_minute: f64,
}

impl TrendSummary {
    /// Summarizes a series.
    ///
    /// Returns `None` without an anchor or with fewer than two samples.
    pub fn from_series(series: &Series) -> Option<Self> {
        if series.len() < 2 {
            return None;
        }
        let anchor = series.anchor()?;
        let last = series.last()?;

        let total_change = follower_delta(last.followers, anchor.followers);
        let duration = last.timestamp - anchor.timestamp;
        let seconds = duration.num_milliseconds() as f64 / 1000.0;
        let rate_per_minute = if seconds > 0.0 {
            total_change as f64 / (seconds / 60.0)
        } else {
            0.0
        };

        Some(Self {
            start: anchor.timestamp,
            end: last.timestamp,
            duration,
            total_change,
            rate_per_minute,
        })
    }

    /// Duration in whole seconds.
    pub fn duration_secs(&self) -> i64 {
        self.duration.num_seconds()
    }
}

impl fmt::Display for TrendSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Monitoring summary ===")?;
        writeln!(f, "Start: {}", format_timestamp(&self.start))?;
        writeln!(f, "End: {}", format_timestamp(&self.end))?;
        writeln!(f, "Duration: {}", format_duration(self.duration))?;
        writeln!(f, "Total change: {}", format_signed(self.total_change))?;
        write!(f, "Average rate: {:+.2} followers/min", self.rate_per_minute)
    }
}
