//! File-based configuration loading

use std::fs;
use std::path::Path;

use super::NavigationConfig;
use crate::error::{NavError, NavResult};

/// Load configuration from a file
///
/// Supports JSON and TOML based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> NavResult<NavigationConfig> {
    if !path.exists() {
        tracing::debug!("config file {} not found, using defaults", path.display());
        return Ok(NavigationConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        NavError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            NavError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            NavError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}
