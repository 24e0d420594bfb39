//! Command line arguments.

use clap::{Args, Parser, Subcommand};
use fwatch_common::JournalMode;
use fwatch_config::Config;
use std::path::PathBuf;

/// Follower-count monitor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level filter, overrides the configuration file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the display name for a UID
    Resolve {
        /// Numeric account identifier
        uid: String,
    },
    /// Monitor a UID until interrupted or the run duration elapses
    Run(RunArgs),
}

/// Options of the `run` subcommand. Anything given here overrides the
/// configuration file and the environment.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Numeric account identifier
    #[arg(short, long)]
    pub uid: Option<String>,

    /// Seconds between polls (at least 40)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Stop after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Mirror log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// `overwrite` the log file or `append` to an existing one
    #[arg(long, requires = "log_file")]
    pub log_mode: Option<JournalMode>,

    /// Write the series to this CSV file when the session ends
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Render the trend chart to this PNG file when the session ends
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Let the OS sleep while monitoring
    #[arg(long)]
    pub allow_sleep: bool,
}

impl RunArgs {
    /// Overlays the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(uid) = &self.uid {
            config.monitor.uid = Some(uid.clone());
        }
        if let Some(interval) = self.interval {
            config.monitor.interval_secs = interval;
        }
        if let Some(duration) = self.duration {
            config.monitor.run_duration_secs = Some(duration);
        }
        if let Some(path) = &self.log_file {
            config.journal.path = Some(path.clone());
        }
        if let Some(mode) = self.log_mode {
            config.journal.mode = mode;
        }
        if let Some(path) = &self.csv {
            config.export.csv_path = Some(path.clone());
        }
        if let Some(path) = &self.chart {
            config.export.chart_path = Some(path.clone());
        }
        if self.allow_sleep {
            config.monitor.keep_awake = false;
        }
    }
}
