//! Configuration schema definitions using serde with validation attributes.

use fwatch_common::JournalMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main configuration structure for fwatch.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Remote API configuration.
    #[validate]
    pub api: ApiConfig,
    /// Polling session configuration.
    #[validate]
    pub monitor: MonitorConfig,
    /// Log file persistence.
    pub journal: JournalConfig,
    /// Export destinations.
    pub export: ExportConfig,
    /// Chart styling.
    #[validate]
    pub chart: ChartConfig,
    /// Diagnostics logging.
    pub logging: LoggingSettings,
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    /// API host base URL.
    #[validate(url(message = "API base URL must be a valid URL"))]
    pub base_url: String,
    /// Profile page base URL used for the Referer header.
    #[validate(url(message = "Space base URL must be a valid URL"))]
    pub space_base_url: String,
    /// User-Agent header value.
    #[validate(length(min = 1, message = "User agent cannot be empty"))]
    pub user_agent: String,
    /// Identity lookup timeout in seconds.
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub identity_timeout_secs: u64,
    /// Statistics lookup timeout in seconds.
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub stats_timeout_secs: u64,
}

/// Polling session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitorConfig {
    /// Account identifier to monitor.
    pub uid: Option<String>,
    /// Seconds between polls.
    #[validate(range(min = 40, message = "Interval must be an integer of at least 40 seconds"))]
    pub interval_secs: u64,
    /// Stop automatically after this many seconds; run until interrupted when unset.
    pub run_duration_secs: Option<u64>,
    /// Ask the OS not to sleep while a session runs.
    pub keep_awake: bool,
}

/// Log file persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Log file path; persistence is disabled when unset.
    pub path: Option<PathBuf>,
    /// Whether to truncate or append to the file.
    pub mode: JournalMode,
}

/// Export destinations, written when a session ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// CSV output path.
    pub csv_path: Option<PathBuf>,
    /// PNG chart output path.
    pub chart_path: Option<PathBuf>,
}

/// Chart styling.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart width in pixels.
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,
    /// Chart height in pixels.
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,
    /// Chart title.
    pub title: String,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Line and marker color (hex format).
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Line color must be a hex color like #1F77B4"))]
    pub line_color: String,
    /// Background color (hex format).
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be a hex color like #FFFFFF"))]
    pub background_color: String,
    /// Whether to draw grid lines.
    pub show_grid: bool,
}

/// Diagnostics logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `fwatch_monitor=debug`.
    pub level: String,
    /// `pretty`, `compact` or `full`.
    pub format: String,
    /// Optional diagnostics file, separate from the journal log file.
    pub file: Option<String>,
}
