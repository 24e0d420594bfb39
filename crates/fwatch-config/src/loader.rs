//! Configuration loading: YAML file, then environment overrides, then validation.

use crate::schema::Config;
use fwatch_common::{FwatchError, Result as FwatchResult};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "FWATCH_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Derive-based validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Cross-field validation error
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for FwatchError {
    fn from(err: ConfigError) -> Self {
        FwatchError::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse_yaml(&content)?;
        debug!("Parsed configuration from {}", path.as_ref().display());

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Parse a YAML document; missing sections and fields take their defaults
    pub fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from the default locations and the environment
    pub fn load() -> FwatchResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)?
        } else if Path::new("fwatch.yaml").exists() {
            Self::load_config("fwatch.yaml")?
        } else if Path::new("fwatch.yml").exists() {
            Self::load_config("fwatch.yml")?
        } else {
            info!("No configuration file found, using defaults");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all()?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FwatchResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply `FWATCH_*` environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uid) = lookup("FWATCH_UID") {
            config.monitor.uid = Some(uid);
        }

        if let Some(interval) = lookup("FWATCH_INTERVAL") {
            config.monitor.interval_secs = parse_var("FWATCH_INTERVAL", &interval)?;
        }

        if let Some(duration) = lookup("FWATCH_RUN_DURATION") {
            config.monitor.run_duration_secs = Some(parse_var("FWATCH_RUN_DURATION", &duration)?);
        }

        if let Some(keep_awake) = lookup("FWATCH_KEEP_AWAKE") {
            config.monitor.keep_awake = parse_var("FWATCH_KEEP_AWAKE", &keep_awake)?;
        }

        if let Some(url) = lookup("FWATCH_API_BASE_URL") {
            config.api.base_url = url;
        }

        if let Some(url) = lookup("FWATCH_SPACE_BASE_URL") {
            config.api.space_base_url = url;
        }

        if let Some(agent) = lookup("FWATCH_USER_AGENT") {
            config.api.user_agent = agent;
        }

        if let Some(path) = lookup("FWATCH_LOG_FILE") {
            config.journal.path = Some(path.into());
        }

        if let Some(mode) = lookup("FWATCH_LOG_MODE") {
            config.journal.mode = parse_var("FWATCH_LOG_MODE", &mode)?;
        }

        if let Some(path) = lookup("FWATCH_CSV_PATH") {
            config.export.csv_path = Some(path.into());
        }

        if let Some(path) = lookup("FWATCH_CHART_PATH") {
            config.export.chart_path = Some(path.into());
        }

        if let Some(level) = lookup("FWATCH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
