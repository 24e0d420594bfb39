//! Series recorder: appends samples and writes one journal line per sample.

use crate::journal::Journal;
use crate::series::Series;
use chrono::{DateTime, Local};
use fwatch_common::{format_signed, format_timestamp, Sample, Target};
use std::sync::Arc;
use tracing::debug;

/// Records samples for one target into a session-owned [`Series`].
#[derive(Debug)]
pub struct SeriesRecorder {
    target: Target,
    series: Series,
    journal: Arc<Journal>,
}

impl SeriesRecorder {
    /// Creates a recorder with an empty series.
    pub fn new(target: Target, journal: Arc<Journal>) -> Self {
        Self {
            target,
            series: Series::new(),
            journal,
        }
    }

    /// Appends a sample, logs it and returns its delta.
    pub fn record(&mut self, followers: u64, timestamp: DateTime<Local>, is_bootstrap: bool) -> i64 {
        let delta = self
            .series
            .push(Sample::new(timestamp, followers), is_bootstrap);
        self.journal
            .emit(self.format_line(timestamp, followers, delta, is_bootstrap));
        delta
    }

    /// Appends the closing sample of a stopped session.
    ///
    /// Repeats the last known count at `timestamp` and logs it like any
    /// other sample. Does nothing on an empty series.
    pub fn close_series(&mut self, timestamp: DateTime<Local>) -> Option<Sample> {
        let followers = self.series.last()?.followers;
        self.record(followers, timestamp, false);
        self.journal.emit("Final data point appended");
        debug!(uid = %self.target.uid, followers, "Closed series");
        self.series.last().copied()
    }

    /// Follower count of the latest sample.
    pub fn last_followers(&self) -> Option<u64> {
        self.series.last().map(|s| s.followers)
    }

    /// The series recorded so far.
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// The monitored target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Gives up the recorder, returning the series.
    pub fn into_series(self) -> Series {
        self.series
    }

    fn format_line(
        &self,
        timestamp: DateTime<Local>,
        followers: u64,
        delta: i64,
        is_bootstrap: bool,
    ) -> String {
        let mut line = format!(
            "[{}] uid: {}, name: {}, followers: {}, change: {}",
            format_timestamp(&timestamp),
            self.target.uid,
            self.target.name,
            followers,
            format_signed(delta)
        );
        if is_bootstrap {
            line.push_str(" (bootstrap)");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use fwatch_common::Uid;

    fn recorder() -> (SeriesRecorder, Arc<Journal>) {
        let journal = Arc::new(Journal::new());
        let target = Target::new(Uid::parse("546195").unwrap(), "tester").unwrap();
        (SeriesRecorder::new(target, Arc::clone(&journal)), journal)
    }

    fn at(offset_secs: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 20, 9, 30, 0).unwrap() + Duration::seconds(offset_secs)
    }

    #[test]
    fn test_record_logs_bootstrap_and_delta() {
        let (mut recorder, journal) = recorder();
        assert_eq!(recorder.record(1000, at(0), true), 0);
        assert_eq!(recorder.record(1004, at(60), false), 4);
        assert_eq!(recorder.record(1001, at(120), false), -3);

        let lines = journal.history();
        assert_eq!(
            lines[0],
            "[2024-05-20 09:30:00] uid: 546195, name: tester, followers: 1000, change: +0 (bootstrap)"
        );
        assert_eq!(
            lines[1],
            "[2024-05-20 09:31:00] uid: 546195, name: tester, followers: 1004, change: +4"
        );
        assert!(lines[2].ends_with("change: -3"));
        assert_eq!(recorder.series().anchor_index(), Some(1));
    }

    #[test]
    fn test_close_series_repeats_last_count() {
        let (mut recorder, journal) = recorder();
        recorder.record(1000, at(0), true);

        let closing = recorder.close_series(at(30)).unwrap();
        assert_eq!(closing.followers, 1000);
        assert_eq!(recorder.series().len(), 2);
        assert_eq!(recorder.series().anchor_index(), Some(1));

        let lines = journal.history();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "[2024-05-20 09:30:30] uid: 546195, name: tester, followers: 1000, change: +0"
        );
        assert_eq!(lines[2], "Final data point appended");
    }

    #[test]
    fn test_close_empty_series_is_noop() {
        let (mut recorder, journal) = recorder();
        assert!(recorder.close_series(at(0)).is_none());
        assert!(recorder.series().is_empty());
        assert!(journal.history().is_empty());
    }
}
