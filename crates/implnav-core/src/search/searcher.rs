//! Two-phase implementor search

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::CandidateFilter;
use crate::config::SearchConfig;
use crate::error::NavResult;
use crate::model::{ProgramModel, Symbol};

/// Per-invocation search policy
#[derive(Debug, Clone)]
pub struct SearchStrategy {
    /// Candidates must pass this filter in both phases
    pub filter: CandidateFilter,
    /// Navigate to a sole result instead of leaving a one-item list open
    pub suppress_single_item_popup: bool,
}

impl SearchStrategy {
    pub fn new(filter: CandidateFilter, suppress_single_item_popup: bool) -> Self {
        Self {
            filter,
            suppress_single_item_popup,
        }
    }
}

/// How the exhaustive phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustiveOutcome {
    Completed,
    /// Cancelled externally or stopped by the callback
    Cancelled,
}

/// The anchor is offered among its own implementations only when it has the
/// capability and the search was started from its declaration.
pub fn include_self(anchor: &Symbol, on_reference: bool) -> bool {
    anchor.include_self_in_implementations && !on_reference
}

/// Enumerates implementors of an anchor over a [`ProgramModel`]
#[derive(Clone)]
pub struct ImplementationSearcher {
    model: Arc<dyn ProgramModel>,
    strategy: SearchStrategy,
    config: SearchConfig,
}

impl fmt::Debug for ImplementationSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationSearcher")
            .field("strategy", &self.strategy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImplementationSearcher {
    pub fn new(model: Arc<dyn ProgramModel>, strategy: SearchStrategy, config: SearchConfig) -> Self {
        Self {
            model,
            strategy,
            config,
        }
    }

    pub fn strategy(&self) -> &SearchStrategy {
        &self.strategy
    }

    /// Quick bounded pass for immediate display.
    ///
    /// Stops at `first_batch_limit` accepted candidates, or once the time
    /// budget is spent and something has been found. `Ok(None)` means there
    /// is nothing to show at all.
    pub fn search_first_batch(
        &self,
        anchor: &Symbol,
        include_self: bool,
    ) -> NavResult<Option<Vec<Symbol>>> {
        let started = Instant::now();
        let budget = self.config.first_batch_time_budget();
        let limit = self.config.first_batch_limit;
        let filter = &self.strategy.filter;

        let mut batch = Vec::new();
        if include_self && filter.accept(anchor) {
            batch.push(anchor.clone());
        }

        if batch.len() < limit {
            self.walk(anchor, |candidate| {
                if filter.accept(&candidate) {
                    batch.push(candidate);
                }
                if batch.len() >= limit || (!batch.is_empty() && started.elapsed() >= budget) {
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            })?;
        }

        if batch.is_empty()
            && self.config.include_self_if_no_others
            && anchor.include_self_in_implementations
            && filter.accept(anchor)
        {
            batch.push(anchor.clone());
        }

        debug!(
            "first batch for {}: {} candidate(s) in {:?}",
            anchor.id,
            batch.len(),
            started.elapsed()
        );

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }

    /// Full traversal for the background task.
    ///
    /// Yields every implementor except the anchor itself. The token is
    /// checked before each callback; once it is cancelled, or the callback
    /// breaks, no further callbacks happen. Filtering is the caller's job.
    pub fn search_exhaustive<F>(
        &self,
        anchor: &Symbol,
        cancel: &CancellationToken,
        mut on_each: F,
    ) -> NavResult<ExhaustiveOutcome>
    where
        F: FnMut(Symbol) -> ControlFlow<()>,
    {
        if cancel.is_cancelled() {
            return Ok(ExhaustiveOutcome::Cancelled);
        }

        let completed = self.walk(anchor, |candidate| {
            if cancel.is_cancelled() {
                return ControlFlow::Break(());
            }
            on_each(candidate)
        })?;

        if completed {
            Ok(ExhaustiveOutcome::Completed)
        } else {
            Ok(ExhaustiveOutcome::Cancelled)
        }
    }

    /// Breadth-first walk over transitive implementors. Each model query is
    /// its own read operation. Returns `false` if `visit` broke early.
    fn walk<F>(&self, anchor: &Symbol, mut visit: F) -> NavResult<bool>
    where
        F: FnMut(Symbol) -> ControlFlow<()>,
    {
        let mut visited = HashSet::from([anchor.id.clone()]);
        let mut queue = VecDeque::from([anchor.id.clone()]);

        while let Some(current) = queue.pop_front() {
            for implementor in self.model.direct_implementors(&current)? {
                if !visited.insert(implementor.id.clone()) {
                    continue;
                }
                queue.push_back(implementor.id.clone());
                if visit(implementor).is_break() {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}
