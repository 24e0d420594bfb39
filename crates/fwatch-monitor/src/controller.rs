//! Session lifecycle: validated start, cooperative stop, summary on exit.

use crate::journal::Journal;
use crate::scheduler::{PollInterval, PollScheduler};
use crate::session::{ActiveTarget, SessionReport, SessionState, SystemClock, WallClock};
use crate::source::FollowerSource;
use crate::stats::TrendSummary;
use fwatch_common::{FwatchError, Result, Target, Uid};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct RunningSession {
    uid: Uid,
    cancel: CancellationToken,
    handle: JoinHandle<SessionReport>,
}

/// Result of stopping a session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// What the worker recorded
    pub report: SessionReport,
    /// Trend statistics, when at least two samples and an anchor exist
    pub summary: Option<TrendSummary>,
}

/// Starts and stops monitoring sessions, one at a time.
pub struct MonitorController {
    source: Arc<dyn FollowerSource>,
    journal: Arc<Journal>,
    clock: Arc<dyn WallClock>,
    active: Arc<ActiveTarget>,
    running: Option<RunningSession>,
}

impl std::fmt::Debug for MonitorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorController")
            .field("journal", &self.journal)
            .field("active", &self.active.get())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl MonitorController {
    /// Creates an idle controller.
    pub fn new(source: Arc<dyn FollowerSource>, journal: Arc<Journal>) -> Self {
        Self {
            source,
            journal,
            clock: Arc::new(SystemClock),
            active: Arc::new(ActiveTarget::new()),
            running: None,
        }
    }

    /// Takes sample timestamps from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    /// The journal sessions write to.
    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }

    /// The active-target slot shared with the worker.
    pub fn active_target(&self) -> Arc<ActiveTarget> {
        Arc::clone(&self.active)
    }

    /// Whether a session was started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Validates the inputs and starts a session.
    ///
    /// `name` is the resolved display name; an empty one means the identity
    /// lookup failed. Must be called from within a tokio runtime.
    pub fn start(&mut self, uid: &str, name: &str, interval_secs: u64) -> Result<()> {
        let uid = Uid::parse(uid)?;
        let target = Target::new(uid, name)?;
        let interval = PollInterval::from_secs(interval_secs)?;
        self.start_target(target, interval)
    }

    /// Starts a session for an already validated target.
    pub fn start_target(&mut self, target: Target, interval: PollInterval) -> Result<()> {
        if self.running.is_some() {
            return Err(FwatchError::validation_field(
                "A monitoring session is already running",
                "session",
            ));
        }

        let uid = target.uid.clone();
        let cancel = CancellationToken::new();
        self.active.set(uid.clone());

        self.journal.emit(format!(
            "Monitoring started: uid: {}, name: {}, interval: {}s",
            target.uid,
            target.name,
            interval.as_secs()
        ));

        let state = SessionState {
            target,
            interval,
            cancel: cancel.clone(),
            active: Arc::clone(&self.active),
            journal: Arc::clone(&self.journal),
            clock: Arc::clone(&self.clock),
        };
        let handle = tokio::spawn(PollScheduler::new(state, Arc::clone(&self.source)).run());

        info!(uid = %uid, "Session started");
        self.running = Some(RunningSession {
            uid,
            cancel,
            handle,
        });
        Ok(())
    }

    /// Stops the running session and summarizes it.
    ///
    /// Returns `Ok(None)` when no session is running.
    pub async fn stop(&mut self) -> Result<Option<SessionOutcome>> {
        let Some(session) = self.running.take() else {
            debug!("Stop requested with no running session");
            return Ok(None);
        };

        session.cancel.cancel();
        let report = session.handle.await.map_err(|e| {
            warn!("Session worker did not finish cleanly: {}", e);
            FwatchError::session(format!("Session worker failed: {e}"))
        })?;

        if self.active.is(&session.uid) {
            self.active.clear();
        }

        let summary = if report.series.len() >= 2 {
            TrendSummary::from_series(&report.series)
        } else {
            None
        };

        match &summary {
            Some(summary) => self.journal.emit(summary.to_string()),
            None => info!(
                samples = report.series.len(),
                "Not enough data for a summary"
            ),
        }
        self.journal.emit("Monitoring stopped");

        Ok(Some(SessionOutcome { report, summary }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PausedClock;
    use crate::source::MockFollowerSource;
    use std::time::Duration;

    fn controller(followers: u64) -> MonitorController {
        let mut source = MockFollowerSource::new();
        source.expect_follower_count().returning(move |_| Ok(followers));
        MonitorController::new(Arc::new(source), Arc::new(Journal::new()))
            .with_clock(Arc::new(PausedClock::new()))
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_input() {
        let mut controller = controller(1);

        assert!(controller.start("", "name", 60).is_err());
        assert!(controller.start("12a", "name", 60).is_err());
        assert!(controller.start("12", "", 60).is_err());
        assert!(controller.start("12", "name", 39).is_err());
        assert!(!controller.is_running());
        assert!(controller.journal().history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_refused() {
        let mut controller = controller(1);
        controller.start("12", "name", 40).unwrap();

        let err = controller.start("13", "other", 60).unwrap_err();
        assert!(err.to_string().contains("already running"));
        assert!(controller.active_target().is(&Uid::parse("12").unwrap()));

        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_without_session() {
        let mut controller = controller(1);
        assert!(controller.stop().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_summarizes_and_clears_target() {
        let mut controller = controller(500);
        controller.start("7", "seven", 60).unwrap();

        tokio::time::sleep(Duration::from_secs(90)).await;
        let outcome = controller.stop().await.unwrap().unwrap();

        assert_eq!(outcome.report.series.len(), 3);
        let summary = outcome.summary.unwrap();
        assert_eq!(summary.total_change, 0);
        assert_eq!(summary.duration_secs(), 30);
        assert!(controller.active_target().get().is_none());
        assert!(!controller.is_running());

        let history = controller.journal().history();
        assert!(history.iter().any(|l| l.starts_with("=== Monitoring summary ===")));
        assert_eq!(history.last().unwrap(), "Monitoring stopped");
    }
}
