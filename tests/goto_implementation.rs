//! End-to-end goto-implementation scenarios
//!
//! Drives resolution, the first batch and the background delivery task
//! together, against the demo model and against small hand-built hierarchies.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use implnav::search::{
    CandidateFilter, ImplementationSearcher, RankingComparator, Renderer, SearchStrategy,
};
use implnav::{
    Delivery, DeliveryTask, Document, GotoImplementation, InMemoryProgram, NavError, NavResult,
    NavigationConfig, Navigator, ProgramModel, ResultPresenter, SearchResults, Symbol, SymbolId,
    SymbolKind, TerminalState,
};
use implnav::model::Location;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

fn demo_program() -> Arc<InMemoryProgram> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/shapes.json");
    Arc::new(InMemoryProgram::load(&path).unwrap())
}

fn demo_document(program: &InMemoryProgram) -> Document {
    program.document("shapes.kt").unwrap()
}

/// Offset of the `nth` occurrence of `needle` in the document
fn nth_offset(document: &Document, needle: &str, nth: usize) -> usize {
    document.text.match_indices(needle).nth(nth).unwrap().0
}

fn symbol(id: &str) -> Symbol {
    Symbol {
        id: SymbolId::new(id),
        name: id.to_string(),
        kind: SymbolKind::Class,
        container: None,
        location: Location {
            path: "h.kt".to_string(),
            offset: 0,
            line: 1,
            column: 1,
        },
        include_self_in_implementations: false,
    }
}

#[derive(Default)]
struct Events {
    seeded: Vec<String>,
    /// Every `deliver_one` call, accepted or not
    attempts: usize,
    delivered: Vec<String>,
    dismissed: usize,
    completions: Vec<TerminalState>,
}

/// Presenter recording every call; optionally rejects or cancels at the
/// n-th delivery
struct Recorder {
    events: Arc<Mutex<Events>>,
    reject_at: Option<usize>,
    cancel_at: Option<(usize, CancellationToken)>,
}

impl Recorder {
    fn new(events: Arc<Mutex<Events>>) -> Self {
        Self {
            events,
            reject_at: None,
            cancel_at: None,
        }
    }
}

impl ResultPresenter for Recorder {
    fn seed(&mut self, candidates: &[Symbol]) {
        self.events.lock().seeded = candidates.iter().map(|c| c.id.to_string()).collect();
    }

    fn deliver_one(&mut self, candidate: &Symbol) -> Delivery {
        let mut events = self.events.lock();
        events.attempts += 1;
        let attempt = events.attempts;
        if self.reject_at.is_some_and(|at| attempt >= at) {
            return Delivery::Rejected;
        }
        events.delivered.push(candidate.id.to_string());
        if let Some((at, token)) = &self.cancel_at {
            if *at == attempt {
                token.cancel();
            }
        }
        Delivery::Accepted
    }

    fn dismiss(&mut self) {
        self.events.lock().dismissed += 1;
    }

    fn on_complete(&mut self, _results: &SearchResults, state: TerminalState) {
        self.events.lock().completions.push(state);
    }
}

struct RecordingNavigator {
    targets: Arc<Mutex<Vec<String>>>,
    succeed: bool,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, candidate: &Symbol) -> bool {
        self.targets.lock().push(candidate.id.to_string());
        self.succeed
    }
}

fn navigator(succeed: bool) -> (RecordingNavigator, Arc<Mutex<Vec<String>>>) {
    let targets = Arc::new(Mutex::new(Vec::new()));
    (
        RecordingNavigator {
            targets: targets.clone(),
            succeed,
        },
        targets,
    )
}

/// Hierarchy given as symbol -> direct implementors
struct Edges(HashMap<&'static str, Vec<&'static str>>);

impl ProgramModel for Edges {
    fn direct_implementors(&self, id: &SymbolId) -> NavResult<Vec<Symbol>> {
        Ok(self
            .0
            .get(id.as_str())
            .map(|ids| ids.iter().map(|id| symbol(id)).collect())
            .unwrap_or_default())
    }
}

struct Keys(HashMap<&'static str, &'static str>);

impl Renderer for Keys {
    fn comparing_key(&self, candidate: &Symbol) -> String {
        self.0
            .get(candidate.id.as_str())
            .map(|key| key.to_string())
            .unwrap_or_else(|| candidate.id.to_string())
    }
}

fn task_over(
    model: Edges,
    anchor: &str,
    first_batch: &[&str],
    comparator: RankingComparator,
    presenter: Recorder,
    navigator: RecordingNavigator,
) -> DeliveryTask {
    let searcher = ImplementationSearcher::new(
        Arc::new(model),
        SearchStrategy::new(CandidateFilter::accept_all(), true),
        NavigationConfig::default().search,
    );
    let results = SearchResults::seeded(
        symbol(anchor),
        first_batch.iter().map(|id| symbol(id)),
        comparator,
    );
    DeliveryTask::new(results, searcher, Box::new(presenter), Box::new(navigator))
}

#[test]
fn test_bee_cee_ay_scenario() {
    let model = Edges(HashMap::from([("X", vec!["C", "A", "B"])]));
    let comparator = RankingComparator::new(Arc::new(Keys(HashMap::from([
        ("A", "Ay"),
        ("B", "Bee"),
        ("C", "Cee"),
    ]))));
    let events = Arc::new(Mutex::new(Events::default()));
    let (navigator, targets) = navigator(true);

    let task = task_over(model, "X", &["B"], comparator, Recorder::new(events.clone()), navigator);
    let report = task.run(&CancellationToken::new()).unwrap();

    let ids: Vec<&str> = report.candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(report.state, TerminalState::Finished);
    assert_eq!(report.deliveries, 3);
    assert!(!report.navigated);

    let events = events.lock();
    assert_eq!(events.delivered, vec!["B", "C", "A"]);
    assert_eq!(events.completions, vec![TerminalState::Finished]);
    assert!(targets.lock().is_empty());
}

#[test]
fn test_diamond_is_delivered_once() {
    let model = Edges(HashMap::from([
        ("A", vec!["B", "C"]),
        ("B", vec!["D"]),
        ("C", vec!["D"]),
    ]));
    let events = Arc::new(Mutex::new(Events::default()));
    let (navigator, _) = navigator(true);

    let task = task_over(
        model,
        "A",
        &["B", "D"],
        RankingComparator::default(),
        Recorder::new(events.clone()),
        navigator,
    );
    let report = task.run(&CancellationToken::new()).unwrap();

    assert_eq!(report.candidates.len(), 3);
    let mut delivered = events.lock().delivered.clone();
    delivered.sort();
    delivered.dedup();
    assert_eq!(delivered.len(), events.lock().delivered.len());
    assert_eq!(report.deliveries, 3);
}

#[test]
fn test_rejection_halts_delivery() {
    let model = Edges(HashMap::from([("X", vec!["A", "B", "C", "D"])]));
    let events = Arc::new(Mutex::new(Events::default()));
    let mut presenter = Recorder::new(events.clone());
    presenter.reject_at = Some(2);
    let (navigator, targets) = navigator(true);

    let task = task_over(model, "X", &["A"], RankingComparator::default(), presenter, navigator);
    let report = task.run(&CancellationToken::new()).unwrap();

    assert_eq!(report.state, TerminalState::Cancelled);
    assert_eq!(report.deliveries, 1);
    // One accepted call, then the rejected one, then nothing
    assert_eq!(events.lock().attempts, 2);
    assert_eq!(events.lock().delivered, vec!["A"]);
    assert_eq!(events.lock().completions, vec![TerminalState::Cancelled]);
    assert!(targets.lock().is_empty());
}

#[test]
fn test_zero_implementors_aborts_before_any_task() {
    let program = demo_program();
    let document = demo_document(&program);
    let action = GotoImplementation::for_program(program, NavigationConfig::default());

    // `Circle.area` is a leaf without the self capability
    let circle_area = nth_offset(&document, "area", 3);
    assert!(action.invoke(&document, circle_area).unwrap().is_none());
}

#[test]
fn test_self_inclusion_truth_table() {
    let program = demo_program();
    let document = demo_document(&program);
    let action = GotoImplementation::for_program(program, NavigationConfig::default());

    let contains_anchor = |offset: usize| {
        let prepared = action.invoke(&document, offset).unwrap().unwrap();
        prepared
            .first_batch()
            .iter()
            .any(|candidate| candidate.id == prepared.anchor().id)
    };

    // Capability set: Shape.area on its declaration, then on `shape.area()`
    assert!(contains_anchor(nth_offset(&document, "area", 0)));
    assert!(!contains_anchor(nth_offset(&document, "area", 4)));
    // No capability: Polygon.area on its declaration, then on `poly.area()`
    assert!(!contains_anchor(nth_offset(&document, "area", 1)));
    assert!(!contains_anchor(nth_offset(&document, "area", 5)));
}

#[tokio::test]
async fn test_sole_result_navigates_and_dismisses() {
    let program = demo_program();
    let document = demo_document(&program);
    let action = GotoImplementation::for_program(program, NavigationConfig::default());
    let prepared = action
        .invoke(&document, nth_offset(&document, "area", 5))
        .unwrap()
        .unwrap();

    let events = Arc::new(Mutex::new(Events::default()));
    let (navigator, targets) = navigator(true);
    let report = prepared
        .start(Box::new(Recorder::new(events.clone())), Box::new(navigator))
        .join()
        .await
        .unwrap();

    assert!(report.navigated);
    assert_eq!(events.lock().seeded, vec!["Square.area"]);
    assert_eq!(*targets.lock(), vec!["Square.area"]);
    assert_eq!(events.lock().dismissed, 1);
    assert_eq!(events.lock().completions, vec![TerminalState::Finished]);
}

#[tokio::test]
async fn test_failed_navigation_keeps_list_open() {
    let program = demo_program();
    let document = demo_document(&program);
    let action = GotoImplementation::for_program(program, NavigationConfig::default());
    let prepared = action
        .invoke(&document, nth_offset(&document, "area", 5))
        .unwrap()
        .unwrap();

    let events = Arc::new(Mutex::new(Events::default()));
    let (navigator, targets) = navigator(false);
    let report = prepared
        .start(Box::new(Recorder::new(events.clone())), Box::new(navigator))
        .join()
        .await
        .unwrap();

    assert!(!report.navigated);
    assert_eq!(targets.lock().len(), 1);
    assert_eq!(events.lock().dismissed, 0);
}

#[tokio::test]
async fn test_order_is_independent_of_first_batch_size() {
    let program = demo_program();
    let document = demo_document(&program);
    let offset = nth_offset(&document, "Shape", 0);

    let mut orders = Vec::new();
    for limit in [1, 2, 100] {
        let mut config = NavigationConfig::default();
        config.search.first_batch_limit = limit;
        let action = GotoImplementation::for_program(program.clone(), config);
        let prepared = action.invoke(&document, offset).unwrap().unwrap();

        let events = Arc::new(Mutex::new(Events::default()));
        let (navigator, _) = navigator(true);
        let report = prepared
            .start(Box::new(Recorder::new(events.clone())), Box::new(navigator))
            .join()
            .await
            .unwrap();
        assert_eq!(report.state, TerminalState::Finished);

        let ids: Vec<String> = report.candidates.iter().map(|c| c.id.to_string()).collect();
        orders.push(ids);
    }

    assert_eq!(orders[0], vec!["Circle", "Polygon", "Shape", "Square"]);
    assert!(orders.iter().all(|order| *order == orders[0]));
}

#[tokio::test]
async fn test_external_cancel_during_delivery() {
    let program = demo_program();
    let document = demo_document(&program);
    let action = GotoImplementation::for_program(program, NavigationConfig::default());
    let prepared = action
        .invoke(&document, nth_offset(&document, "area", 0))
        .unwrap()
        .unwrap();

    let cancel = CancellationToken::new();
    let events = Arc::new(Mutex::new(Events::default()));
    let mut presenter = Recorder::new(events.clone());
    presenter.cancel_at = Some((1, cancel.clone()));
    let (navigator, targets) = navigator(true);

    let handle = prepared.start_with_token(Box::new(presenter), Box::new(navigator), cancel);
    handle.cancel();
    let report = handle.join().await.unwrap();

    assert_eq!(report.state, TerminalState::Cancelled);
    assert!(report.deliveries <= 1);
    assert_eq!(events.lock().completions, vec![TerminalState::Cancelled]);
    assert!(targets.lock().is_empty());
}

struct Broken;

impl ProgramModel for Broken {
    fn direct_implementors(&self, id: &SymbolId) -> NavResult<Vec<Symbol>> {
        if id.as_str() == "X" {
            Ok(vec![symbol("A")])
        } else {
            Err(NavError::traversal_at("index corrupted", id.clone()))
        }
    }
}

#[test]
fn test_traversal_fault_surfaces_after_completion() {
    let searcher = ImplementationSearcher::new(
        Arc::new(Broken),
        SearchStrategy::new(CandidateFilter::accept_all(), true),
        NavigationConfig::default().search,
    );
    let results = SearchResults::seeded(symbol("X"), [symbol("A")], RankingComparator::default());
    let events = Arc::new(Mutex::new(Events::default()));
    let (navigator, targets) = navigator(true);
    let task = DeliveryTask::new(
        results,
        searcher,
        Box::new(Recorder::new(events.clone())),
        Box::new(navigator),
    );

    let error = task.run(&CancellationToken::new()).unwrap_err();
    assert!(matches!(error, NavError::Traversal { .. }));
    assert_eq!(events.lock().completions, vec![TerminalState::Cancelled]);
    assert!(targets.lock().is_empty());
}

#[test]
fn test_toml_model_and_config_files() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let model_path = temp_dir.path().join("model.toml");
    std::fs::write(
        &model_path,
        r#"
[[documents]]
path = "a.kt"
text = "interface A\nclass B : A\nclass C : A\n"

[[symbols]]
id = "A"
name = "A"
kind = "interface"
path = "a.kt"
name_offset = 10

[[symbols]]
id = "B"
name = "B"
kind = "class"
path = "a.kt"
name_offset = 18
implements = ["A"]

[[symbols]]
id = "C"
name = "C"
kind = "class"
path = "a.kt"
name_offset = 30
implements = ["A"]
"#,
    )
    .unwrap();
    let config_path = temp_dir.path().join("implnav.json");
    std::fs::write(
        &config_path,
        serde_json::json!({ "search": { "first_batch_limit": 1 } }).to_string(),
    )
    .unwrap();

    let config = implnav::config::load_from_file(&config_path).unwrap();
    assert_eq!(config.search.first_batch_limit, 1);

    let program = Arc::new(InMemoryProgram::load(&model_path).unwrap());
    let document = program.document("a.kt").unwrap();
    let action = GotoImplementation::for_program(program, config);
    let prepared = action.invoke(&document, 10).unwrap().unwrap();

    // The interface itself fills a batch of one
    assert_eq!(prepared.first_batch().len(), 1);
    assert_eq!(prepared.anchor().id.as_str(), "A");
}
