//! # fwatch Common
//!
//! Shared types, error handling, logging bootstrap and the platform API
//! client used across the fwatch workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bilibili;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use bilibili::{ApiEnvelope, BiliClient, BiliConfig, IdentityData, RelationStat};
pub use error::{FwatchError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
