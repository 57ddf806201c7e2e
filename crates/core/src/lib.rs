//! Core utilities for LearnHub search tools
//!
//! This crate provides shared functionality used by the search binaries:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use learnhub_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("course threshold: {}", config.schema.search.course_threshold);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, LoggingConfig, SearchConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
