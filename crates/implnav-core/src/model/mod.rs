//! Program model types and queries
//!
//! The pipeline only needs identity, a few presentable fields and the
//! "may include itself" capability from a symbol. Indexing is left to the
//! [`ProgramModel`] implementation; [`InMemoryProgram`] is the reference one.

mod file;
mod memory;
mod program;
mod types;

pub use file::{DocumentEntry, ProgramFile, ReferenceEntry, SymbolEntry, TypeEntry};
pub use memory::InMemoryProgram;
pub use program::ProgramModel;
pub use types::{Document, Location, Reference, Symbol, SymbolId, SymbolKind};
