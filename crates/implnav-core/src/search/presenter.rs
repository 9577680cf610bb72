//! Presentation and navigation collaborators

use std::fmt;

use super::SearchResults;
use crate::model::Symbol;

/// Answer of the presentation layer to a single delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    /// The list is gone (closed, discarded); stop searching
    Rejected,
}

/// Terminal state a delivery task ends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalState {
    Cancelled,
    Finished,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

/// The live chooser list.
///
/// Every call receives a borrow that is only valid for the call; the
/// presenter keeps its own copy of whatever it wants to display.
pub trait ResultPresenter: Send {
    /// Show the first batch, already in ranking order
    fn seed(&mut self, candidates: &[Symbol]);

    /// Add one candidate to the list
    fn deliver_one(&mut self, candidate: &Symbol) -> Delivery;

    /// Update the list title
    fn set_caption(&mut self, _caption: &str) {}

    /// Close the list
    fn dismiss(&mut self);

    /// Called exactly once when the task reaches a terminal state
    fn on_complete(&mut self, results: &SearchResults, state: TerminalState);
}

/// Jumps to a chosen element
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send {
    /// `true` if the editor moved to the candidate
    fn navigate_to(&mut self, candidate: &Symbol) -> bool;
}
