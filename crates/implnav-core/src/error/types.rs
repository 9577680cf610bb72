//! Core error type for implnav

use thiserror::Error;

use crate::model::SymbolId;

/// Result type alias for navigation operations
pub type NavResult<T> = Result<T, NavError>;

/// Main error type for the implementation search pipeline
#[derive(Error, Debug, Clone)]
pub enum NavError {
    /// A program model query failed during implementor traversal
    #[error("Traversal error: {message}")]
    Traversal {
        message: String,
        /// Symbol whose implementors were being enumerated
        symbol: Option<SymbolId>,
    },

    /// The anchor resolver failed (distinct from "no symbol at offset")
    #[error("Resolution error: {message}")]
    Resolution { message: String },

    /// The background worker panicked
    #[error("Search task panicked: {message}")]
    TaskPanicked { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Program model file is unreadable or inconsistent
    #[error("Model error: {message}")]
    Model {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(String),
}

impl NavError {
    /// Context attached to the error, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } | Self::Model { context, .. } => context.as_deref(),
            _ => None,
        }
    }

    /// Whether the error comes from the search itself rather than from setup
    pub fn is_search_fault(&self) -> bool {
        matches!(self, Self::Traversal { .. } | Self::TaskPanicked { .. })
    }
}

/// Extension trait for turning an `Option` into a model error
pub trait OptionExt<T> {
    /// Convert `None` into [`NavError::Model`] with the given message
    fn or_model_error<C: std::fmt::Display>(self, message: C) -> NavResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_model_error<C: std::fmt::Display>(self, message: C) -> NavResult<T> {
        self.ok_or_else(|| NavError::model(message.to_string()))
    }
}
