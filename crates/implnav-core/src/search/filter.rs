//! Candidate filtering against the originating reference

use std::fmt;
use std::sync::Arc;

use crate::model::{Reference, Symbol};

/// Decides whether a found element is a legitimate target for a reference.
///
/// Covariance and override checks belong to the program model; callers trust
/// the answer and never re-derive it.
pub trait ReferenceAcceptor: Send + Sync {
    fn accept_implementation_for_reference(
        &self,
        reference: Option<&Reference>,
        candidate: &Symbol,
    ) -> bool;
}

/// Acceptor that takes every candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ReferenceAcceptor for AcceptAll {
    fn accept_implementation_for_reference(&self, _: Option<&Reference>, _: &Symbol) -> bool {
        true
    }
}

/// Acceptor bound to the reference a search was started from
#[derive(Clone)]
pub struct CandidateFilter {
    acceptor: Arc<dyn ReferenceAcceptor>,
    reference: Option<Reference>,
}

impl CandidateFilter {
    pub fn new(acceptor: Arc<dyn ReferenceAcceptor>, reference: Option<Reference>) -> Self {
        Self {
            acceptor,
            reference,
        }
    }

    /// Filter that accepts everything
    pub fn accept_all() -> Self {
        Self::new(Arc::new(AcceptAll), None)
    }

    pub fn accept(&self, candidate: &Symbol) -> bool {
        self.acceptor
            .accept_implementation_for_reference(self.reference.as_ref(), candidate)
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }
}

impl fmt::Debug for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFilter")
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}
