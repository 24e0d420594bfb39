//! End-to-end session tests driven by a scripted follower source.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use fwatch_common::{FwatchError, JournalMode, Result, Uid};
use fwatch_monitor::{FollowerSource, Journal, MonitorController, StopReason, WallClock};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Replays a fixed list of responses, optionally taking time to answer.
struct ScriptedSource {
    script: Mutex<VecDeque<Result<u64>>>,
    latency: Duration,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<u64>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl FollowerSource for ScriptedSource {
    async fn follower_count(&self, _uid: &Uid) -> Result<u64> {
        self.calls.lock().push(Instant::now());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FwatchError::network("script exhausted")))
    }
}

/// Wall-clock time that advances with tokio's paused clock.
#[derive(Debug)]
struct PausedClock {
    origin: Instant,
    wall_origin: DateTime<Local>,
}

impl PausedClock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: Instant::now(),
            wall_origin: Local::now(),
        })
    }
}

impl WallClock for PausedClock {
    fn now(&self) -> DateTime<Local> {
        self.wall_origin + chrono::Duration::from_std(self.origin.elapsed()).unwrap()
    }
}

fn controller_with(source: Arc<ScriptedSource>) -> MonitorController {
    MonitorController::new(source, Arc::new(Journal::new())).with_clock(PausedClock::new())
}

#[tokio::test(start_paused = true)]
async fn test_slow_responses_do_not_shift_the_schedule() {
    let source = Arc::new(
        ScriptedSource::new(vec![Ok(1), Ok(2), Ok(3), Ok(4)]).with_latency(Duration::from_secs(5)),
    );
    let mut controller = controller_with(Arc::clone(&source));
    controller.start("100", "slow", 40).unwrap();

    tokio::time::sleep(Duration::from_secs(100)).await;
    let outcome = controller.stop().await.unwrap().unwrap();

    let calls = source.call_times();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1] - calls[0], Duration::from_secs(40));
    assert_eq!(calls[2] - calls[1], Duration::from_secs(40));
    assert_eq!(outcome.report.series.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_full_session_summary() {
    let mut script = vec![Ok(990), Ok(1000)];
    script.extend((1..=10).map(|i| Ok(1000 + i * 5)));
    let source = Arc::new(ScriptedSource::new(script));
    let mut controller = controller_with(source);
    controller.start("546195", "tester", 60).unwrap();

    // last scripted poll at 660 s, stop half an interval later
    tokio::time::sleep(Duration::from_secs(690)).await;
    let outcome = controller.stop().await.unwrap().unwrap();

    let series = &outcome.report.series;
    assert_eq!(series.len(), 13);
    assert_eq!(series.anchor().unwrap().followers, 1000);
    assert_eq!(series.last().unwrap().followers, 1050);

    let summary = outcome.summary.unwrap();
    assert_eq!(summary.total_change, 50);
    assert_eq!(summary.duration_secs(), 630);
    assert!(summary.to_string().contains("Average rate: +4.76 followers/min"));
}

#[tokio::test(start_paused = true)]
async fn test_errors_never_append() {
    let source = Arc::new(ScriptedSource::new(vec![
        Err(FwatchError::api(-412, "request blocked")),
        Ok(300),
        Err(FwatchError::network("Request timeout")),
        Ok(301),
        Err(FwatchError::api(-412, "request blocked")),
    ]));
    let mut controller = controller_with(source);
    controller.start("9", "nine", 40).unwrap();

    tokio::time::sleep(Duration::from_secs(170)).await;
    let outcome = controller.stop().await.unwrap().unwrap();
    let report = outcome.report;

    assert_eq!(report.polls.successes, 2);
    assert_eq!(report.polls.remote_errors, 2);
    assert_eq!(report.polls.transport_errors, 1);
    assert_eq!(report.series.len() as u64, report.polls.successes + 1);
    assert!(report.final_sample_appended);
    assert_eq!(report.series.deltas(), vec![0, 1, 0]);

    let history = controller.journal().history();
    assert!(history
        .iter()
        .any(|l| l == "API error: request blocked (code: -412)"));
}

#[tokio::test(start_paused = true)]
async fn test_stop_with_empty_series() {
    let source = Arc::new(ScriptedSource::new(vec![]));
    let mut controller = controller_with(source);
    controller.start("9", "nine", 40).unwrap();

    tokio::time::sleep(Duration::from_secs(90)).await;
    let outcome = controller.stop().await.unwrap().unwrap();

    assert!(outcome.report.series.is_empty());
    assert!(outcome.summary.is_none());
    assert!(!outcome.report.final_sample_appended);
    assert_eq!(outcome.report.polls.transport_errors, 3);
}

#[tokio::test(start_paused = true)]
async fn test_stale_worker_records_nothing_after_target_change() {
    let source = Arc::new(ScriptedSource::new((0..10).map(|_| Ok(50)).collect()));
    let mut controller = controller_with(Arc::clone(&source));
    controller.start("11", "eleven", 60).unwrap();

    tokio::time::sleep(Duration::from_secs(61)).await;
    controller.active_target().set(Uid::parse("22").unwrap());
    tokio::time::sleep(Duration::from_secs(300)).await;

    assert_eq!(source.call_times().len(), 2);

    let outcome = controller.stop().await.unwrap().unwrap();
    assert_eq!(outcome.report.stop_reason, StopReason::Superseded);
    assert_eq!(outcome.report.series.len(), 2);
    assert!(!outcome.report.final_sample_appended);
    // the newer target is left alone
    assert!(controller.active_target().is(&Uid::parse("22").unwrap()));
}

#[tokio::test(start_paused = true)]
async fn test_session_lines_reach_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.log");
    let journal = Arc::new(Journal::with_file(&path, JournalMode::Overwrite).unwrap());

    let source = Arc::new(ScriptedSource::new(vec![Ok(10), Ok(12)]));
    let mut controller =
        MonitorController::new(source, Arc::clone(&journal)).with_clock(PausedClock::new());
    controller.start("33", "thirty-three", 45).unwrap();

    tokio::time::sleep(Duration::from_secs(50)).await;
    controller.stop().await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Monitoring started: uid: 33, name: thirty-three, interval: 45s\n"));
    assert!(content.contains("followers: 10, change: +0 (bootstrap)"));
    assert!(content.contains("followers: 12, change: +2"));
    assert!(content.contains("Final data point appended"));
    assert!(content.contains("Total change: +0"));
    assert!(content.trim_end().ends_with("Monitoring stopped"));
}
