//! Configuration model

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{NavError, NavResult};

/// Log formats accepted by the CLI subscriber
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Searcher tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum candidates collected by the synchronous first batch
    pub first_batch_limit: usize,
    /// Wall-clock budget for the first batch, in milliseconds
    pub first_batch_time_budget_ms: u64,
    /// Offer the anchor alone when nothing else implements it
    pub include_self_if_no_others: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            first_batch_limit: 100,
            first_batch_time_budget_ms: 250,
            include_self_if_no_others: false,
        }
    }
}

impl SearchConfig {
    pub fn first_batch_time_budget(&self) -> Duration {
        Duration::from_millis(self.first_batch_time_budget_ms)
    }
}

/// Presentation behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Jump straight to a sole result instead of showing a one-item list
    pub auto_navigate_single: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            auto_navigate_single: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl NavigationConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> NavResult<()> {
        if self.search.first_batch_limit == 0 {
            return Err(NavError::config_with_context(
                "first_batch_limit must be at least 1",
                "Validating search configuration",
            ));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(NavError::config_with_context(
                format!(
                    "Unknown log format '{}', expected one of: {}",
                    self.logging.format,
                    LOG_FORMATS.join(", ")
                ),
                "Validating logging configuration",
            ));
        }
        Ok(())
    }
}
