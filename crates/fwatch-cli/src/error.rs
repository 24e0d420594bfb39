//! Application-wide error types using thiserror.

use fwatch_common::FwatchError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Error from one of the library crates.
    #[error(transparent)]
    Fwatch(#[from] FwatchError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] fwatch_config::ConfigError),

    /// The identity lookup returned no display name.
    #[error("UID {uid} could not be resolved to a display name")]
    Unresolved {
        /// The identifier that was looked up
        uid: String,
    },

    /// A run was requested without an identifier.
    #[error("No UID given; pass --uid or set monitor.uid in the configuration")]
    MissingUid,
}

/// Result type for the CLI application.
pub type CliResult<T> = Result<T, CliError>;
