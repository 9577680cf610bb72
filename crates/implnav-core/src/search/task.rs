//! Background delivery task
//!
//! Owns one invocation's exhaustive search: delivers the seeded first batch,
//! streams newly found implementors to the presenter, and on a clean finish
//! with a single result navigates to it.

use std::any::Any;
use std::fmt;
use std::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{
    Delivery, ExhaustiveOutcome, ImplementationSearcher, Navigator, ResultPresenter, SearchResults,
    TerminalState,
};
use crate::error::{NavError, NavResult};
use crate::model::Symbol;

/// Lifecycle of a delivery task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Running,
    Cancelled,
    Finished,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Finished)
    }
}

impl From<TerminalState> for TaskState {
    fn from(state: TerminalState) -> Self {
        match state {
            TerminalState::Cancelled => Self::Cancelled,
            TerminalState::Finished => Self::Finished,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

/// What a task did, returned to whoever awaits it
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task_id: Uuid,
    pub state: TerminalState,
    /// Final candidates in ranking order
    pub candidates: Vec<Symbol>,
    /// Accepted `deliver_one` calls
    pub deliveries: usize,
    /// Auto-navigation to a sole result succeeded
    pub navigated: bool,
}

/// Title of the chooser list
pub fn chooser_caption(anchor: &Symbol, count: usize, finished: bool) -> String {
    if finished {
        format!("Choose Implementation of {} ({} found)", anchor.name, count)
    } else {
        format!(
            "Choose Implementation of {} ({} found, searching...)",
            anchor.name, count
        )
    }
}

/// Exhaustive search plus delivery for one invocation
pub struct DeliveryTask {
    id: Uuid,
    state: TaskState,
    results: SearchResults,
    searcher: ImplementationSearcher,
    presenter: Box<dyn ResultPresenter>,
    navigator: Box<dyn Navigator>,
    deliveries: usize,
}

impl DeliveryTask {
    /// Task for an aggregate already seeded with the first batch
    pub fn new(
        results: SearchResults,
        searcher: ImplementationSearcher,
        presenter: Box<dyn ResultPresenter>,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: TaskState::Created,
            results,
            searcher,
            presenter,
            navigator,
            deliveries: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    /// Run on a dedicated blocking worker
    pub fn spawn(self, cancel: CancellationToken) -> TaskHandle {
        let task_id = self.id;
        let token = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || self.run(&token));
        TaskHandle {
            task_id,
            cancel,
            handle,
        }
    }

    /// Run to a terminal state on the current thread.
    ///
    /// The presenter's completion callback fires exactly once whatever
    /// happens. A traversal fault or a panic inside the search ends the task
    /// as cancelled and is returned as the error.
    pub fn run(mut self, cancel: &CancellationToken) -> NavResult<TaskReport> {
        self.transition(TaskState::Running);
        info!(
            task_id = %self.id,
            anchor = %self.results.anchor().id,
            seeded = self.results.len(),
            "implementation search started"
        );

        let outcome = catch_unwind(AssertUnwindSafe(|| self.deliver_all(cancel)));
        let (state, fault) = match outcome {
            Ok(Ok(state)) => (state, None),
            Ok(Err(e)) => {
                error!(task_id = %self.id, "implementation search failed: {}", e);
                (TerminalState::Cancelled, Some(e))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(task_id = %self.id, "implementation search panicked: {}", message);
                (TerminalState::Cancelled, Some(NavError::task_panicked(message)))
            }
        };

        let navigated = self.complete(state);

        match fault {
            Some(e) => Err(e),
            None => Ok(TaskReport {
                task_id: self.id,
                state,
                candidates: self.results.sorted(),
                deliveries: self.deliveries,
                navigated,
            }),
        }
    }

    fn deliver_all(&mut self, cancel: &CancellationToken) -> NavResult<TerminalState> {
        for candidate in self.results.sorted() {
            let delivered = deliver_to(
                &mut *self.presenter,
                &self.results,
                &candidate,
                &mut self.deliveries,
                cancel,
                self.id,
            );
            if !delivered {
                return Ok(TerminalState::Cancelled);
            }
        }

        let task_id = self.id;
        let Self {
            results,
            searcher,
            presenter,
            deliveries,
            ..
        } = self;
        let filter = &searcher.strategy().filter;
        let anchor = results.anchor().clone();

        let outcome = searcher.search_exhaustive(&anchor, cancel, |candidate| {
            if !filter.accept(&candidate) {
                debug!(task_id = %task_id, "filtered out {}", candidate.id);
                return ControlFlow::Continue(());
            }
            if !results.add(candidate.clone()) {
                return ControlFlow::Continue(());
            }
            if deliver_to(&mut **presenter, results, &candidate, deliveries, cancel, task_id) {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })?;

        match outcome {
            ExhaustiveOutcome::Completed if !cancel.is_cancelled() => Ok(TerminalState::Finished),
            _ => Ok(TerminalState::Cancelled),
        }
    }

    /// Completion path; returns whether auto-navigation happened
    fn complete(&mut self, state: TerminalState) -> bool {
        self.transition(state.into());

        if state == TerminalState::Finished {
            let caption = chooser_caption(self.results.anchor(), self.results.len(), true);
            self.presenter.set_caption(&caption);
        }
        self.presenter.on_complete(&self.results, state);
        info!(
            task_id = %self.id,
            state = %state,
            candidates = self.results.len(),
            deliveries = self.deliveries,
            "implementation search ended"
        );

        if state != TerminalState::Finished || !self.searcher.strategy().suppress_single_item_popup {
            return false;
        }
        let Some(only) = self.results.the_only_one() else {
            return false;
        };

        if self.navigator.navigate_to(only) {
            info!(task_id = %self.id, "navigated to sole implementation {}", only.id);
            self.presenter.dismiss();
            true
        } else {
            warn!(
                task_id = %self.id,
                "navigation to {} failed, leaving the list open",
                only.id
            );
            false
        }
    }

    fn transition(&mut self, next: TaskState) {
        if self.state.is_terminal() {
            warn!(task_id = %self.id, "ignoring transition {} -> {}", self.state, next);
            return;
        }
        debug!(task_id = %self.id, "task {} -> {}", self.state, next);
        self.state = next;
    }
}

impl fmt::Debug for DeliveryTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryTask")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("anchor", &self.results.anchor().id)
            .field("candidates", &self.results.len())
            .field("deliveries", &self.deliveries)
            .finish()
    }
}

/// One cancellation checkpoint plus one delivery; `false` stops the task
fn deliver_to(
    presenter: &mut dyn ResultPresenter,
    results: &SearchResults,
    candidate: &Symbol,
    deliveries: &mut usize,
    cancel: &CancellationToken,
    task_id: Uuid,
) -> bool {
    if cancel.is_cancelled() {
        debug!(task_id = %task_id, "cancelled before delivering {}", candidate.id);
        return false;
    }

    match presenter.deliver_one(candidate) {
        Delivery::Accepted => {
            *deliveries += 1;
            debug!(task_id = %task_id, "delivered {}", candidate.id);
            presenter.set_caption(&chooser_caption(results.anchor(), results.len(), false));
            true
        }
        Delivery::Rejected => {
            warn!(
                task_id = %task_id,
                "presenter rejected {}, cancelling search",
                candidate.id
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle to a task running on the search worker
#[derive(Debug)]
pub struct TaskHandle {
    task_id: Uuid,
    cancel: CancellationToken,
    handle: JoinHandle<NavResult<TaskReport>>,
}

impl TaskHandle {
    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    /// Request cancellation; takes effect at the next checkpoint. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the terminal state
    pub async fn join(self) -> NavResult<TaskReport> {
        self.handle.await?
    }
}
