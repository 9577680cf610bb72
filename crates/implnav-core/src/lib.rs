//! Implnav Core Library
//!
//! Goto-implementation for a program model: resolve the symbol under the
//! cursor, show a quick first batch of implementors, then keep streaming the
//! rest from a cancellable background task.

pub mod config;
pub mod error;
pub mod goto;
pub mod model;
pub mod resolve;
pub mod search;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{NavigationConfig, load_config};
pub use error::{NavError, NavResult};
pub use goto::{GotoImplementation, PreparedSearch};
pub use model::{Document, InMemoryProgram, ProgramModel, Reference, Symbol, SymbolId, SymbolKind};
pub use resolve::{AnchorResolver, ResolveFlags, ResolvedAnchor};
pub use search::{
    Delivery, DeliveryTask, Navigator, ResultPresenter, SearchResults, TaskHandle, TaskReport,
    TaskState, TerminalState,
};
