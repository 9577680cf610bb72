//! Goto-implementation entry point
//!
//! Resolves the anchor under the cursor, runs the first batch on the calling
//! thread and hands back a [`PreparedSearch`] that can be started as a
//! background [`DeliveryTask`]. No list is created when the first batch is
//! empty.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::NavigationConfig;
use crate::error::NavResult;
use crate::model::{Document, InMemoryProgram, ProgramModel, Reference, Symbol};
use crate::resolve::{AnchorResolver, ResolvedAnchor, resolve_anchor};
use crate::search::{
    CandidateFilter, DeliveryTask, ImplementationSearcher, Navigator, RankingComparator,
    ReferenceAcceptor, Renderer, ResultPresenter, SearchResults, SearchStrategy, TaskHandle,
    chooser_caption, include_self,
};

/// Find-implementations action wired to its collaborators
#[derive(Clone)]
pub struct GotoImplementation {
    resolver: Arc<dyn AnchorResolver>,
    model: Arc<dyn ProgramModel>,
    acceptor: Arc<dyn ReferenceAcceptor>,
    comparator: RankingComparator,
    config: NavigationConfig,
}

impl GotoImplementation {
    pub fn new(
        resolver: Arc<dyn AnchorResolver>,
        model: Arc<dyn ProgramModel>,
        acceptor: Arc<dyn ReferenceAcceptor>,
        config: NavigationConfig,
    ) -> Self {
        Self {
            resolver,
            model,
            acceptor,
            comparator: RankingComparator::default(),
            config,
        }
    }

    /// Use one in-memory program as resolver, model and acceptor
    pub fn for_program(program: Arc<InMemoryProgram>, config: NavigationConfig) -> Self {
        Self::new(program.clone(), program.clone(), program, config)
    }

    /// Replace the default qualified-name ordering
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.comparator = RankingComparator::new(renderer);
        self
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Resolve the cursor and collect the first batch.
    ///
    /// `Ok(None)` is a clean abort: there is no symbol at `offset`, or it has
    /// no implementations to show.
    pub fn invoke(&self, document: &Document, offset: usize) -> NavResult<Option<PreparedSearch>> {
        let Some(resolved) = resolve_anchor(self.resolver.as_ref(), document, offset)? else {
            info!("no symbol at {}:{}", document.path, offset);
            return Ok(None);
        };
        debug!(
            anchor = %resolved.anchor.id,
            on_reference = resolved.on_reference,
            "resolved implementation anchor"
        );

        let filter = CandidateFilter::new(self.acceptor.clone(), resolved.reference.clone());
        let strategy = SearchStrategy::new(filter, self.config.presentation.auto_navigate_single);
        let searcher =
            ImplementationSearcher::new(self.model.clone(), strategy, self.config.search.clone());

        let include_self = include_self(&resolved.anchor, resolved.on_reference);
        let Some(first_batch) = searcher.search_first_batch(&resolved.anchor, include_self)? else {
            info!("no implementations of {}", resolved.anchor.qualified_name());
            return Ok(None);
        };

        let results =
            SearchResults::seeded(resolved.anchor.clone(), first_batch, self.comparator.clone());
        Ok(Some(PreparedSearch {
            resolved,
            results,
            searcher,
        }))
    }
}

impl fmt::Debug for GotoImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GotoImplementation")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A resolved invocation whose first batch is ready to show
#[derive(Debug)]
pub struct PreparedSearch {
    resolved: ResolvedAnchor,
    results: SearchResults,
    searcher: ImplementationSearcher,
}

impl PreparedSearch {
    pub fn anchor(&self) -> &Symbol {
        &self.resolved.anchor
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.resolved.reference.as_ref()
    }

    pub fn on_reference(&self) -> bool {
        self.resolved.on_reference
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    /// First batch in ranking order
    pub fn first_batch(&self) -> Vec<Symbol> {
        self.results.sorted()
    }

    pub fn caption(&self) -> String {
        chooser_caption(self.anchor(), self.results.len(), false)
    }

    /// Seed the presenter and start the exhaustive phase on a blocking
    /// worker. Must be called from within a tokio runtime.
    pub fn start(
        self,
        presenter: Box<dyn ResultPresenter>,
        navigator: Box<dyn Navigator>,
    ) -> TaskHandle {
        self.start_with_token(presenter, navigator, CancellationToken::new())
    }

    /// Like [`start`](Self::start), with a caller-owned cancellation token
    pub fn start_with_token(
        self,
        presenter: Box<dyn ResultPresenter>,
        navigator: Box<dyn Navigator>,
        cancel: CancellationToken,
    ) -> TaskHandle {
        self.into_task(presenter, navigator).spawn(cancel)
    }

    /// Seed the presenter and build the task without running it
    pub fn into_task(
        self,
        mut presenter: Box<dyn ResultPresenter>,
        navigator: Box<dyn Navigator>,
    ) -> DeliveryTask {
        presenter.seed(&self.results.sorted());
        presenter.set_caption(&self.caption());
        DeliveryTask::new(self.results, self.searcher, presenter, navigator)
    }
}
