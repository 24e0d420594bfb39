//! Common type definitions and newtype wrappers for domain modeling.

use crate::error::{FwatchError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric account identifier on the platform.
///
/// Kept as the digit string the user typed so leading zeros and very long
/// identifiers survive untouched in URLs and log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uid(String);

impl Uid {
    /// Validates and wraps an identifier. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FwatchError::validation_field("UID cannot be empty", "uid"));
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(FwatchError::validation_field("UID must be numeric", "uid"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Uid {
    type Err = FwatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Uid {
    type Error = FwatchError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Uid> for String {
    fn from(uid: Uid) -> Self {
        uid.0
    }
}

/// The account being monitored: identifier plus resolved display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Account identifier
    pub uid: Uid,
    /// Display name as returned by the identity lookup
    pub name: String,
}

impl Target {
    /// Creates a target, rejecting an empty (unresolved) display name.
    pub fn new(uid: Uid, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FwatchError::validation_field(
                "Display name could not be resolved, check the UID",
                "name",
            ));
        }
        Ok(Self { uid, name })
    }
}

/// How a user-selected log file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// Create the file, truncating any previous content
    #[default]
    Overwrite,
    /// Append to a file that must already exist
    Append,
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => f.write_str("overwrite"),
            Self::Append => f.write_str("append"),
        }
    }
}

impl FromStr for JournalMode {
    type Err = FwatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" | "new" => Ok(Self::Overwrite),
            "append" => Ok(Self::Append),
            other => Err(FwatchError::validation_field(
                format!("Unknown log mode '{other}', expected 'overwrite' or 'append'"),
                "mode",
            )),
        }
    }
}

/// One follower-count observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock time the observation was taken
    pub timestamp: DateTime<Local>,
    /// Follower count reported by the platform
    pub followers: u64,
}

impl Sample {
    /// Creates a new sample.
    pub const fn new(timestamp: DateTime<Local>, followers: u64) -> Self {
        Self {
            timestamp,
            followers,
        }
    }
}
