//! Implementation search and delivery
//!
//! The searcher produces candidates in two phases. The first batch is
//! collected synchronously and seeds a [`SearchResults`] aggregate; a
//! [`DeliveryTask`] then streams the exhaustive phase to a
//! [`ResultPresenter`] on a background worker and decides whether to jump
//! straight to a sole result.

mod filter;
mod presenter;
mod ranking;
mod results;
mod searcher;
mod task;

pub use filter::{AcceptAll, CandidateFilter, ReferenceAcceptor};
pub use presenter::{Delivery, Navigator, ResultPresenter, TerminalState};
pub use ranking::{QualifiedNameRenderer, RankingComparator, RenderedItem, Renderer};
pub use results::SearchResults;
pub use searcher::{ExhaustiveOutcome, ImplementationSearcher, SearchStrategy, include_self};
pub use task::{DeliveryTask, TaskHandle, TaskReport, TaskState, chooser_caption};

#[cfg(test)]
pub(crate) use presenter::MockNavigator;
