//! # fwatch Monitor
//!
//! Polling sessions for a single account: the drift-free poll loop, the
//! series recorder, trend statistics and the session controller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod journal;
pub mod recorder;
pub mod scheduler;
pub mod series;
pub mod session;
pub mod source;
pub mod stats;

pub use controller::{MonitorController, SessionOutcome};
pub use journal::Journal;
pub use recorder::SeriesRecorder;
pub use scheduler::{PollInterval, PollScheduler, MIN_POLL_INTERVAL_SECS};
pub use series::Series;
pub use session::{
    ActiveTarget, PollStats, SessionReport, SessionState, StopReason, SystemClock, WallClock,
};
pub use source::FollowerSource;
pub use stats::TrendSummary;
