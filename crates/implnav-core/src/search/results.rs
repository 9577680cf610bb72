//! Search result aggregate

use std::collections::HashSet;

use super::RankingComparator;
use crate::model::{Symbol, SymbolId};

/// Anchor plus every accepted candidate, in arrival order.
///
/// Identities are unique and candidates are never removed once accepted.
/// Presentation order is always recomputed through the comparator.
#[derive(Debug, Clone)]
pub struct SearchResults {
    anchor: Symbol,
    candidates: Vec<Symbol>,
    seen: HashSet<SymbolId>,
    comparator: RankingComparator,
}

impl SearchResults {
    pub fn new(anchor: Symbol, comparator: RankingComparator) -> Self {
        Self {
            anchor,
            candidates: Vec::new(),
            seen: HashSet::new(),
            comparator,
        }
    }

    /// Aggregate seeded with a first batch (duplicates in the batch collapse)
    pub fn seeded(
        anchor: Symbol,
        first_batch: impl IntoIterator<Item = Symbol>,
        comparator: RankingComparator,
    ) -> Self {
        let mut results = Self::new(anchor, comparator);
        for candidate in first_batch {
            results.add(candidate);
        }
        results
    }

    /// Add a candidate; `false` if its identity is already present
    pub fn add(&mut self, candidate: Symbol) -> bool {
        if !self.seen.insert(candidate.id.clone()) {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    pub fn contains(&self, id: &SymbolId) -> bool {
        self.seen.contains(id)
    }

    pub fn anchor(&self) -> &Symbol {
        &self.anchor
    }

    /// Candidates in the order they were accepted
    pub fn candidates(&self) -> &[Symbol] {
        &self.candidates
    }

    /// Candidates in ranking order
    pub fn sorted(&self) -> Vec<Symbol> {
        self.comparator.sorted(&self.candidates)
    }

    pub fn comparator(&self) -> &RankingComparator {
        &self.comparator
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The sole candidate, if there is exactly one
    pub fn the_only_one(&self) -> Option<&Symbol> {
        match self.candidates.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}
