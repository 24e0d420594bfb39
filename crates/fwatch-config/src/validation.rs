//! Validation utilities, regex patterns and cross-field checks.

use crate::loader::ConfigError;
use crate::schema::Config;
use fwatch_common::{JournalMode, Uid};
use regex::Regex;
use std::sync::LazyLock;
use validator::Validate;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #1f77b4)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

impl Config {
    /// Runs the derive-based validation plus the checks it cannot express.
    pub fn validate_all(&self) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(uid) = &self.monitor.uid {
            Uid::parse(uid).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        if self.journal.mode == JournalMode::Append {
            if let Some(path) = &self.journal.path {
                if !path.exists() {
                    return Err(ConfigError::Invalid(format!(
                        "Log file {} does not exist; append mode needs an existing file",
                        path.display()
                    )));
                }
            }
        }

        if let Some(0) = self.monitor.run_duration_secs {
            return Err(ConfigError::Invalid(
                "Run duration must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
