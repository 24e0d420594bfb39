//! Drift-free poll loop.
//!
//! Each session runs one [`PollScheduler`] on its own tokio task. Deadlines
//! advance by exactly one interval per iteration whatever happened during
//! the poll, so a slow or failed request never shifts later polls.

use crate::recorder::SeriesRecorder;
use crate::session::{PollStats, SessionReport, SessionState, StopReason};
use crate::source::FollowerSource;
use fwatch_common::{FwatchError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Smallest accepted poll interval, in seconds.
pub const MIN_POLL_INTERVAL_SECS: u64 = 40;

/// A validated poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    /// Validates an interval given in whole seconds.
    pub fn from_secs(secs: u64) -> Result<Self> {
        if secs < MIN_POLL_INTERVAL_SECS {
            return Err(FwatchError::validation_field(
                format!(
                    "Interval must be an integer of at least {MIN_POLL_INTERVAL_SECS} seconds, got {secs}"
                ),
                "interval",
            ));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    /// The interval as a duration.
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// The interval in seconds.
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl TryFrom<u64> for PollInterval {
    type Error = FwatchError;

    fn try_from(secs: u64) -> Result<Self> {
        Self::from_secs(secs)
    }
}

/// The worker side of a session.
pub struct PollScheduler {
    state: SessionState,
    source: Arc<dyn FollowerSource>,
}

impl std::fmt::Debug for PollScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollScheduler")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PollScheduler {
    /// Creates the worker for a freshly started session.
    pub fn new(state: SessionState, source: Arc<dyn FollowerSource>) -> Self {
        Self { state, source }
    }

    /// Polls until cancelled or superseded and returns what was recorded.
    ///
    /// The first poll happens immediately. A cancelled worker that is still
    /// the active session closes a non-empty series with one more sample
    /// carrying the last known count.
    pub async fn run(self) -> SessionReport {
        let Self { state, source } = self;
        let SessionState {
            target,
            interval,
            cancel,
            active,
            journal,
            clock,
        } = state;

        let uid = target.uid.clone();
        let period = interval.as_duration();
        let mut recorder = SeriesRecorder::new(target, Arc::clone(&journal));
        let mut polls = PollStats::default();
        let mut is_first = true;
        let mut next_tick = Instant::now();

        info!(uid = %uid, interval_secs = interval.as_secs(), "Polling started");

        let stop_reason = loop {
            if !active.is(&uid) {
                break StopReason::Superseded;
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break StopReason::Cancelled,
                () = sleep_until(next_tick) => {}
            }

            if !active.is(&uid) {
                break StopReason::Superseded;
            }

            let timestamp = clock.now();
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => break StopReason::Cancelled,
                result = source.follower_count(&uid) => result,
            };

            // The target may have changed while the request was in flight.
            if !active.is(&uid) {
                break StopReason::Superseded;
            }

            match result {
                Ok(followers) => {
                    recorder.record(followers, timestamp, is_first);
                    is_first = false;
                    polls.successes += 1;
                }
                Err(e) if e.is_remote() => {
                    journal.emit(e.to_string());
                    polls.remote_errors += 1;
                }
                Err(e) => {
                    warn!(uid = %uid, error = ?e, "Follower count request failed");
                    journal.emit(e.to_string());
                    polls.transport_errors += 1;
                }
            }

            next_tick += period;
            debug!(uid = %uid, "Next poll in {:?}", next_tick.saturating_duration_since(Instant::now()));
        };

        let final_sample_appended = stop_reason == StopReason::Cancelled
            && active.is(&uid)
            && recorder.close_series(clock.now()).is_some();

        info!(
            uid = %uid,
            reason = ?stop_reason,
            samples = recorder.series().len(),
            "Polling stopped"
        );

        let target = recorder.target().clone();
        SessionReport {
            target,
            series: recorder.into_series(),
            stop_reason,
            polls,
            final_sample_appended,
        }
    }
}
