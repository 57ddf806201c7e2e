//! CLI utilities for LearnHub search tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Score and duration formatting

#![warn(missing_docs)]

pub mod output;
