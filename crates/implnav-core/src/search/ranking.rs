//! Ranking of candidates by renderer-provided sort keys

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::model::Symbol;

/// A candidate as it appears in the chooser list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub label: String,
    pub location: String,
}

/// Turns candidates into list rows and comparable keys
pub trait Renderer: Send + Sync {
    /// Key the list is ordered by. Must be deterministic for a given candidate.
    fn comparing_key(&self, candidate: &Symbol) -> String;

    fn render(&self, candidate: &Symbol) -> RenderedItem {
        RenderedItem {
            label: self.comparing_key(candidate),
            location: candidate.location.to_string(),
        }
    }
}

/// Orders candidates by their qualified name (`Circle.area`)
#[derive(Debug, Clone, Copy, Default)]
pub struct QualifiedNameRenderer;

impl Renderer for QualifiedNameRenderer {
    fn comparing_key(&self, candidate: &Symbol) -> String {
        candidate.qualified_name()
    }

    fn render(&self, candidate: &Symbol) -> RenderedItem {
        let label = match &candidate.container {
            Some(container) => format!("{} in {}", candidate.name, container),
            None => candidate.name.clone(),
        };
        RenderedItem {
            label,
            location: candidate.location.to_string(),
        }
    }
}

/// Total order over candidates: renderer key, then identity
#[derive(Clone)]
pub struct RankingComparator {
    renderer: Arc<dyn Renderer>,
}

impl RankingComparator {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }

    pub fn compare(&self, a: &Symbol, b: &Symbol) -> Ordering {
        self.renderer
            .comparing_key(a)
            .cmp(&self.renderer.comparing_key(b))
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Sort in place, computing each key once for this pass
    pub fn sort(&self, candidates: &mut [Symbol]) {
        candidates.sort_by_cached_key(|candidate| {
            (self.renderer.comparing_key(candidate), candidate.id.clone())
        });
    }

    pub fn sorted<'a>(&self, candidates: impl IntoIterator<Item = &'a Symbol>) -> Vec<Symbol> {
        let mut sorted: Vec<Symbol> = candidates.into_iter().cloned().collect();
        self.sort(&mut sorted);
        sorted
    }
}

impl Default for RankingComparator {
    fn default() -> Self {
        Self::new(Arc::new(QualifiedNameRenderer))
    }
}

impl fmt::Debug for RankingComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingComparator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, SymbolId, SymbolKind};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct KeyedRenderer {
        keys: HashMap<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl Renderer for KeyedRenderer {
        fn comparing_key(&self, candidate: &Symbol) -> String {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.keys
                .get(candidate.id.as_str())
                .map(|key| key.to_string())
                .unwrap_or_default()
        }
    }

    fn symbol(id: &str) -> Symbol {
        Symbol {
            id: SymbolId::new(id),
            name: id.to_string(),
            kind: SymbolKind::Class,
            container: None,
            location: Location {
                path: "impls.kt".to_string(),
                offset: 0,
                line: 1,
                column: 1,
            },
            include_self_in_implementations: false,
        }
    }

    fn keyed() -> Arc<KeyedRenderer> {
        Arc::new(KeyedRenderer {
            keys: HashMap::from([("B", "Bee"), ("C", "Cee"), ("A", "Ay"), ("A2", "Ay")]),
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_sort_is_lexicographic_on_keys() {
        let comparator = RankingComparator::new(keyed());
        let mut candidates = vec![symbol("B"), symbol("C"), symbol("A")];
        comparator.sort(&mut candidates);

        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_independent_sorts_agree() {
        let comparator = RankingComparator::new(keyed());
        let first = comparator.sorted(&[symbol("C"), symbol("A2"), symbol("B"), symbol("A")]);
        let second = comparator.sorted(&[symbol("A"), symbol("B"), symbol("A2"), symbol("C")]);
        assert_eq!(first, second);
        // Equal keys fall back to identity
        assert_eq!(first[0].id.as_str(), "A");
        assert_eq!(first[1].id.as_str(), "A2");
    }

    #[test]
    fn test_one_key_per_candidate_per_sort() {
        let renderer = keyed();
        let comparator = RankingComparator::new(renderer.clone());
        let mut candidates = vec![symbol("C"), symbol("B"), symbol("A"), symbol("A2")];
        comparator.sort(&mut candidates);
        assert_eq!(renderer.calls.load(AtomicOrdering::SeqCst), 4);
    }

    #[test]
    fn test_compare_matches_sort() {
        let comparator = RankingComparator::new(keyed());
        assert_eq!(comparator.compare(&symbol("A"), &symbol("B")), Ordering::Less);
        assert_eq!(comparator.compare(&symbol("C"), &symbol("B")), Ordering::Greater);
        assert_eq!(comparator.compare(&symbol("A"), &symbol("A")), Ordering::Equal);
    }

    #[test]
    fn test_qualified_name_renderer() {
        let mut circle = symbol("Circle.area");
        circle.name = "area".to_string();
        circle.container = Some("Circle".to_string());

        let item = QualifiedNameRenderer.render(&circle);
        assert_eq!(item.label, "area in Circle");
        assert_eq!(item.location, "impls.kt:1:1");
        assert_eq!(QualifiedNameRenderer.comparing_key(&circle), "Circle.area");
    }
}
