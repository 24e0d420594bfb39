//! Wires configuration, the API client, a monitoring session and the
//! exporters together.

use crate::awake::SleepInhibitor;
use crate::error::{CliError, CliResult};
use fwatch_common::{BiliClient, Target, Uid};
use fwatch_config::Config;
use fwatch_graphs::{ChartOptions, ChartRenderer, CsvExporter, TrendChart};
use fwatch_monitor::{
    FollowerSource, Journal, MonitorController, PollInterval, SessionOutcome, SystemClock,
    WallClock,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// The fwatch application.
pub struct App {
    config: Config,
    client: BiliClient,
    source: Arc<dyn FollowerSource>,
    clock: Arc<dyn WallClock>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Builds the application from a validated configuration.
    pub fn new(config: Config) -> CliResult<Self> {
        let client = BiliClient::new(config.api.to_client_config())?;
        let source: Arc<dyn FollowerSource> = Arc::new(client.clone());
        Ok(Self {
            config,
            client,
            source,
            clock: Arc::new(SystemClock),
        })
    }

    /// Uses `source` for follower counts instead of the API client.
    pub fn with_source(mut self, source: Arc<dyn FollowerSource>) -> Self {
        self.source = source;
        self
    }

    /// Takes sample timestamps from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    /// The effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves a UID to its display name.
    pub async fn resolve(&self, uid: &str) -> CliResult<Target> {
        let uid = Uid::parse(uid)?;
        let name = self
            .client
            .resolve_name(&uid)
            .await
            .ok_or_else(|| CliError::Unresolved {
                uid: uid.to_string(),
            })?;
        Ok(Target::new(uid, name)?)
    }

    /// Resolves the configured UID and monitors it until `shutdown`
    /// completes or the run duration elapses.
    pub async fn run<F>(&self, shutdown: F) -> CliResult<SessionOutcome>
    where
        F: Future<Output = ()>,
    {
        let uid = self.config.monitor.uid.as_deref().ok_or(CliError::MissingUid)?;
        let target = self.resolve(uid).await?;
        info!("Resolved {} to {}", target.uid, target.name);
        self.run_session(target, shutdown).await
    }

    /// Monitors an already resolved target.
    pub async fn run_session<F>(&self, target: Target, shutdown: F) -> CliResult<SessionOutcome>
    where
        F: Future<Output = ()>,
    {
        let interval = PollInterval::from_secs(self.config.monitor.interval_secs)?;
        let journal = Arc::new(match &self.config.journal.path {
            Some(path) => Journal::with_file(path, self.config.journal.mode)?,
            None => Journal::new(),
        });

        let mut controller = MonitorController::new(Arc::clone(&self.source), Arc::clone(&journal))
            .with_clock(Arc::clone(&self.clock));
        controller.start_target(target, interval)?;
        let inhibitor = if self.config.monitor.keep_awake {
            Self::keep_awake(&journal)
        } else {
            None
        };

        let run_for = self.config.monitor.run_duration_secs.map(Duration::from_secs);
        let deadline = async move {
            match run_for {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            () = shutdown => info!("Stop requested"),
            () = deadline => info!("Run duration reached"),
        }

        let stopped = controller.stop().await;
        if let Some(inhibitor) = inhibitor {
            inhibitor.release().await;
        }
        let outcome = stopped?
            .ok_or_else(|| fwatch_common::FwatchError::session("Session ended before it was stopped"))?;

        self.export(&outcome, &journal).await;
        journal.close_file();
        Ok(outcome)
    }

    /// Starts the sleep inhibitor. Failing to start one never fails the run.
    fn keep_awake(journal: &Journal) -> Option<SleepInhibitor> {
        match SleepInhibitor::for_platform() {
            Ok(Some(inhibitor)) => {
                debug!(pid = ?inhibitor.id(), "Preventing system sleep");
                Some(inhibitor)
            }
            Ok(None) => {
                debug!("No sleep inhibitor on this platform");
                None
            }
            Err(e) => {
                warn!("Cannot prevent system sleep: {}", e);
                journal.emit(format!("Warning: cannot prevent system sleep - {e}"));
                None
            }
        }
    }

    /// Writes the configured exports. Failures are reported, not returned.
    pub async fn export(&self, outcome: &SessionOutcome, journal: &Journal) {
        let samples = outcome.report.series.samples();

        if let Some(path) = &self.config.export.csv_path {
            match CsvExporter::new().export_to_file(samples, path) {
                Ok(()) => journal.emit(format!("CSV written to {}", path.display())),
                Err(e) => {
                    error!("CSV export failed: {}", e);
                    journal.emit(format!("CSV export failed: {e}"));
                }
            }
        }

        if let Some(path) = &self.config.export.chart_path {
            let options = ChartOptions::from(&self.config.chart);
            match TrendChart::new().render_to_file(&options, samples, path).await {
                Ok(()) => journal.emit(format!("Chart written to {}", path.display())),
                Err(e) => {
                    error!("Chart export failed: {}", e);
                    journal.emit(format!("Chart export failed: {e}"));
                }
            }
        }
    }
}
