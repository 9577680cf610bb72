//! Environment variable overrides
//!
//! `IMPLNAV_FIRST_BATCH_LIMIT`, `IMPLNAV_AUTO_NAVIGATE` and
//! `IMPLNAV_LOG_LEVEL` take precedence over the config file.

use std::env;

use super::NavigationConfig;
use crate::error::{NavError, NavResult};

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut NavigationConfig) -> NavResult<()> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_overrides_from<F>(config: &mut NavigationConfig, lookup: F) -> NavResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(limit) = lookup("IMPLNAV_FIRST_BATCH_LIMIT") {
        config.search.first_batch_limit = limit
            .trim()
            .parse()
            .map_err(|_| NavError::config(format!("Invalid IMPLNAV_FIRST_BATCH_LIMIT value: {}", limit)))?;
    }

    if let Some(auto) = lookup("IMPLNAV_AUTO_NAVIGATE") {
        config.presentation.auto_navigate_single = match auto.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(NavError::config(format!(
                    "Invalid IMPLNAV_AUTO_NAVIGATE value: {}",
                    auto
                )));
            }
        };
    }

    if let Some(level) = lookup("IMPLNAV_LOG_LEVEL") {
        if !level.trim().is_empty() {
            config.logging.level = level.trim().to_string();
        }
    }

    Ok(())
}
