//! Per-session state shared between the controller and its worker.

use crate::journal::Journal;
use crate::scheduler::PollInterval;
use crate::series::Series;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Local};
use fwatch_common::{Target, Uid};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The identifier currently being monitored, if any.
///
/// A worker keeps polling only while this still names its own target.
#[derive(Debug, Default)]
pub struct ActiveTarget {
    uid: ArcSwapOption<Uid>,
}

impl ActiveTarget {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `uid` the active target, superseding any previous one.
    pub fn set(&self, uid: Uid) {
        self.uid.store(Some(Arc::new(uid)));
    }

    /// Clears the active target.
    pub fn clear(&self) {
        self.uid.store(None);
    }

    /// The active target.
    pub fn get(&self) -> Option<Arc<Uid>> {
        self.uid.load_full()
    }

    /// Whether `uid` is the active target.
    pub fn is(&self, uid: &Uid) -> bool {
        self.uid.load().as_deref() == Some(uid)
    }
}

/// Source of sample timestamps.
pub trait WallClock: Send + Sync + std::fmt::Debug {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Local>;
}

/// The system clock.
///
/// Time spent suspended shows up in the timestamps. A clock adjusted
/// backwards cannot reorder a series since [`Series`] clamps each sample
/// to its predecessor.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Wall-clock time that advances with tokio's clock, for paused-time tests.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct PausedClock {
    mono_origin: tokio::time::Instant,
    wall_origin: DateTime<Local>,
}

#[cfg(test)]
impl PausedClock {
    pub(crate) fn new() -> Self {
        Self {
            mono_origin: tokio::time::Instant::now(),
            wall_origin: Local::now(),
        }
    }
}

#[cfg(test)]
impl WallClock for PausedClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = self.mono_origin.elapsed();
        self.wall_origin + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero())
    }
}

/// Everything a worker needs, created wholesale when a session starts and
/// moved into the worker task.
#[derive(Debug)]
pub struct SessionState {
    /// Monitored account
    pub target: Target,
    /// Poll interval
    pub interval: PollInterval,
    /// Stop signal
    pub cancel: CancellationToken,
    /// Shared active-target slot
    pub active: Arc<ActiveTarget>,
    /// Journal for sample lines and errors
    pub journal: Arc<Journal>,
    /// Timestamp source
    pub clock: Arc<dyn WallClock>,
}

/// Why a worker exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Stopped through its cancellation token
    Cancelled,
    /// Another target became active
    Superseded,
}

/// Poll outcome counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Polls that produced a sample
    pub successes: u64,
    /// Polls the platform answered with a non-zero code
    pub remote_errors: u64,
    /// Polls that failed in transport or decoding
    pub transport_errors: u64,
}

impl PollStats {
    /// Total polls attempted.
    pub fn attempts(&self) -> u64 {
        self.successes + self.remote_errors + self.transport_errors
    }
}

/// What a worker hands back through its join handle.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Monitored account
    pub target: Target,
    /// Everything recorded
    pub series: Series,
    /// How the worker ended
    pub stop_reason: StopReason,
    /// Poll outcome counters
    pub polls: PollStats,
    /// Whether the closing sample was appended
    pub final_sample_appended: bool,
}
