//! Conversions from foreign error types

use super::types::NavError;

impl From<std::io::Error> for NavError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for NavError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<toml::de::Error> for NavError {
    fn from(error: toml::de::Error) -> Self {
        Self::Toml(error.to_string())
    }
}

impl From<tokio::task::JoinError> for NavError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_panic() {
            Self::task_panicked(error.to_string())
        } else {
            Self::traversal(format!("search worker was aborted: {}", error))
        }
    }
}
