//! Structured logging infrastructure for fwatch

use std::fs::OpenOptions;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format of the console/diagnostics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored output
    Pretty,
    /// Single-line output
    Compact,
    /// Default `fmt` output
    Full,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "fwatch=debug")
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Optional file path for diagnostic output
    pub file_path: Option<String>,
    /// Whether to include span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file_path: None,
            include_spans: false,
            include_targets: false,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let file = match &config.file_path {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            match file {
                Some(file) => registry.with(layer.with_ansi(false).with_writer(file)).try_init()?,
                None => registry.with(layer).try_init()?,
            }
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            match file {
                Some(file) => registry.with(layer.with_ansi(false).with_writer(file)).try_init()?,
                None => registry.with(layer).try_init()?,
            }
        }
        LogFormat::Full => {
            let layer = fmt::layer()
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_thread_names(true);
            match file {
                Some(file) => registry.with(layer.with_ansi(false).with_writer(file)).try_init()?,
                None => registry.with(layer).try_init()?,
            }
        }
    }

    Ok(())
}
