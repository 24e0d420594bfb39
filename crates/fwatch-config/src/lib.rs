//! # fwatch Config
//!
//! Type-safe configuration for fwatch: a serde schema validated with
//! `validator`, loaded from YAML with environment variable overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validation::*;
