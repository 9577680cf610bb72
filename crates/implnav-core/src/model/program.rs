//! Program model query surface used by the implementation searcher

use crate::error::NavResult;
use crate::model::{Symbol, SymbolId};

/// Implementor queries over a program model.
///
/// Every call is one read operation: the implementation takes its
/// read-consistency scope on entry and releases it before returning, so a
/// long search never holds the model against writers.
pub trait ProgramModel: Send + Sync {
    /// Elements that directly implement or override `symbol`
    fn direct_implementors(&self, symbol: &SymbolId) -> NavResult<Vec<Symbol>>;
}
