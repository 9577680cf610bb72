//! Constructor methods for NavError

use super::types::NavError;
use crate::model::SymbolId;

impl NavError {
    /// Create a traversal error not tied to a particular symbol
    pub fn traversal(message: impl Into<String>) -> Self {
        Self::Traversal {
            message: message.into(),
            symbol: None,
        }
    }

    /// Create a traversal error for the symbol being expanded
    pub fn traversal_at(message: impl Into<String>, symbol: SymbolId) -> Self {
        Self::Traversal {
            message: message.into(),
            symbol: Some(symbol),
        }
    }

    /// Create a resolution error
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a task panic error
    pub fn task_panicked(message: impl Into<String>) -> Self {
        Self::TaskPanicked {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
            context: None,
        }
    }

    /// Create a model error with context
    pub fn model_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}
