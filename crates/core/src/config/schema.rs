//! Configuration schema definitions
//!
//! Everything has a default, so an empty file is a valid configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Search tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.logging.validate()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Catalog snapshot used when none is given on the command line
    #[serde(default)]
    pub catalog: Option<String>,
}

/// Search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum fuzzy score for course names
    #[serde(default = "default_course_threshold")]
    pub course_threshold: f64,

    /// Minimum fuzzy score for category names
    #[serde(default = "default_category_threshold")]
    pub category_threshold: f64,

    /// Minimum fuzzy score for topic names
    #[serde(default = "default_topic_threshold")]
    pub topic_threshold: f64,

    /// Minimum fuzzy score for user names
    #[serde(default = "default_user_threshold")]
    pub user_threshold: f64,

    /// BK-tree candidates fetched per query
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: usize,

    /// Page size when the caller gives none
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            course_threshold: default_course_threshold(),
            category_threshold: default_category_threshold(),
            topic_threshold: default_topic_threshold(),
            user_threshold: default_user_threshold(),
            candidate_cap: default_candidate_cap(),
            default_page_size: default_page_size(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        let thresholds = [
            ("search.course_threshold", self.course_threshold),
            ("search.category_threshold", self.category_threshold),
            ("search.topic_threshold", self.topic_threshold),
            ("search.user_threshold", self.user_threshold),
        ];
        for (key, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::invalid_config_value(
                    key,
                    format!("{} is outside 0..=100", value),
                ));
            }
        }

        if self.candidate_cap == 0 {
            return Err(Error::invalid_config_value(
                "search.candidate_cap",
                "must be at least 1",
            ));
        }

        if self.default_page_size == 0 {
            return Err(Error::invalid_config_value(
                "search.default_page_size",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn default_course_threshold() -> f64 {
    20.0
}

fn default_category_threshold() -> f64 {
    30.0
}

fn default_topic_threshold() -> f64 {
    40.0
}

fn default_user_threshold() -> f64 {
    40.0
}

fn default_candidate_cap() -> usize {
    30
}

fn default_page_size() -> usize {
    10
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub json: bool,

    /// Include the event target in log lines
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            show_target: false,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(Error::invalid_config_value(
                "logging.level",
                format!("expected one of {}", LEVELS.join(", ")),
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
