//! # fwatch CLI
//!
//! Command line front-end: resolves an account, runs one monitoring
//! session and writes the requested exports when it ends.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod awake;
pub mod cli;
pub mod error;

pub use app::App;
pub use awake::SleepInhibitor;
pub use cli::{Cli, Command, RunArgs};
pub use error::{CliError, CliResult};
