//! Configuration for implementation search and presentation

mod env_loader;
mod file_loader;
mod navigation_config;

pub use env_loader::{apply_env_overrides, apply_overrides_from};
pub use file_loader::load_from_file;
pub use navigation_config::{LoggingConfig, NavigationConfig, PresentationConfig, SearchConfig};

use crate::error::NavResult;
use std::path::Path;

/// Load configuration: file (if given), then `IMPLNAV_*` environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> NavResult<NavigationConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => NavigationConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}
