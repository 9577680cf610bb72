//! In-memory program model
//!
//! Backs the resolver, acceptor and implementor queries with a single
//! `RwLock`. Every query takes the read lock for its own duration only, so
//! `insert_symbol` can land between two steps of a running search.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;

use tracing::debug;

use super::file::{ProgramFile, ReferenceEntry, SymbolEntry};
use super::{Document, Location, ProgramModel, Reference, Symbol, SymbolId};
use crate::error::{NavError, NavResult, OptionExt};
use crate::resolve::{AnchorResolver, ResolveFlags};
use crate::search::ReferenceAcceptor;

#[derive(Debug, Default)]
struct ProgramState {
    documents: HashMap<String, Document>,
    /// Declaration order, for deterministic query results
    order: Vec<SymbolId>,
    symbols: HashMap<SymbolId, Symbol>,
    name_spans: HashMap<SymbolId, Range<usize>>,
    /// Reverse of `implements`: symbol -> direct implementors
    implementors: HashMap<SymbolId, Vec<SymbolId>>,
    references: Vec<Reference>,
    supertypes: HashMap<String, Vec<String>>,
}

/// Program model held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryProgram {
    state: RwLock<ProgramState>,
}

impl InMemoryProgram {
    /// Load and validate a JSON or TOML program file
    pub fn load(path: &Path) -> NavResult<Self> {
        let file = ProgramFile::from_path(path)?;
        Self::from_file(file).map_err(|e| match e {
            NavError::Model { message, .. } => NavError::model_with_context(
                message,
                format!("Validating program model '{}'", path.display()),
            ),
            other => other,
        })
    }

    /// Build from a deserialized program file, rejecting dangling ids and
    /// spans that fall outside their documents
    pub fn from_file(file: ProgramFile) -> NavResult<Self> {
        let mut state = ProgramState::default();

        for entry in file.documents {
            let document = Document::new(entry.path.clone(), entry.text);
            if state.documents.insert(entry.path.clone(), document).is_some() {
                return Err(NavError::model(format!("duplicate document '{}'", entry.path)));
            }
        }

        for entry in &file.symbols {
            state.declare(entry)?;
        }
        for entry in &file.symbols {
            state.link(entry)?;
        }
        for entry in file.references {
            state.add_reference(entry)?;
        }
        for entry in file.types {
            state.supertypes.insert(entry.name, entry.supertypes);
        }

        debug!(
            "loaded program model: {} documents, {} symbols, {} references",
            state.documents.len(),
            state.symbols.len(),
            state.references.len()
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Add a declaration to a live model. On error the model is unchanged.
    pub fn insert_symbol(&self, entry: SymbolEntry) -> NavResult<()> {
        let mut state = self.state.write();
        let (symbol, span) = state.check_declaration(&entry)?;
        state.check_links(&entry)?;
        state.commit_declaration(symbol, span);
        state.commit_links(&entry);
        Ok(())
    }

    pub fn document(&self, path: &str) -> Option<Document> {
        self.state.read().documents.get(path).cloned()
    }

    pub fn symbol(&self, id: &SymbolId) -> Option<Symbol> {
        self.state.read().symbols.get(id).cloned()
    }

    /// All declarations in declaration order
    pub fn symbols(&self) -> Vec<Symbol> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|id| state.symbols.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().symbols.is_empty()
    }
}

impl ProgramState {
    fn declare(&mut self, entry: &SymbolEntry) -> NavResult<()> {
        let (symbol, span) = self.check_declaration(entry)?;
        self.commit_declaration(symbol, span);
        Ok(())
    }

    fn link(&mut self, entry: &SymbolEntry) -> NavResult<()> {
        self.check_links(entry)?;
        self.commit_links(entry);
        Ok(())
    }

    /// Validate a declaration against the current state without touching it
    fn check_declaration(&self, entry: &SymbolEntry) -> NavResult<(Symbol, Range<usize>)> {
        if self.symbols.contains_key(&entry.id) {
            return Err(NavError::model(format!("duplicate symbol id '{}'", entry.id)));
        }
        let document = self
            .documents
            .get(&entry.path)
            .or_model_error(format!("symbol '{}' refers to unknown document '{}'", entry.id, entry.path))?;

        let end = entry
            .name_offset
            .checked_add(entry.name.len())
            .or_model_error(format!(
                "symbol '{}': name offset {} is out of range",
                entry.id, entry.name_offset
            ))?;
        let span = entry.name_offset..end;
        if document.text.get(span.clone()) != Some(entry.name.as_str()) {
            return Err(NavError::model(format!(
                "symbol '{}': name '{}' not found at offset {} of '{}'",
                entry.id, entry.name, entry.name_offset, entry.path
            )));
        }

        let overlaps_reference = self.references.iter().any(|reference| {
            reference.path == entry.path
                && reference.range.start < span.end
                && span.start < reference.range.end
        });
        if overlaps_reference {
            return Err(NavError::model(format!(
                "symbol '{}': name {:?} in '{}' overlaps a reference",
                entry.id, span, entry.path
            )));
        }

        let (line, column) = document.line_column(entry.name_offset);
        let symbol = Symbol {
            id: entry.id.clone(),
            name: entry.name.clone(),
            kind: entry.kind,
            container: entry.container.clone(),
            location: Location {
                path: entry.path.clone(),
                offset: entry.name_offset,
                line,
                column,
            },
            include_self_in_implementations: entry
                .include_self
                .unwrap_or_else(|| entry.kind.is_abstract_by_default()),
        };
        Ok((symbol, span))
    }

    fn commit_declaration(&mut self, symbol: Symbol, span: Range<usize>) {
        self.order.push(symbol.id.clone());
        self.name_spans.insert(symbol.id.clone(), span);
        self.symbols.insert(symbol.id.clone(), symbol);
    }

    fn check_links(&self, entry: &SymbolEntry) -> NavResult<()> {
        for base in &entry.implements {
            if base == &entry.id {
                return Err(NavError::model(format!(
                    "symbol '{}' cannot implement itself",
                    entry.id
                )));
            }
            if !self.symbols.contains_key(base) {
                return Err(NavError::model(format!(
                    "symbol '{}' implements unknown symbol '{}'",
                    entry.id, base
                )));
            }
        }
        Ok(())
    }

    fn commit_links(&mut self, entry: &SymbolEntry) {
        for base in &entry.implements {
            self.implementors
                .entry(base.clone())
                .or_default()
                .push(entry.id.clone());
        }
    }

    fn add_reference(&mut self, entry: ReferenceEntry) -> NavResult<()> {
        if !self.symbols.contains_key(&entry.target) {
            return Err(NavError::model(format!(
                "reference at {}:{} targets unknown symbol '{}'",
                entry.path, entry.offset, entry.target
            )));
        }
        let document = self
            .documents
            .get(&entry.path)
            .or_model_error(format!("reference refers to unknown document '{}'", entry.path))?;
        let end = entry.offset.checked_add(entry.len).or_model_error(format!(
            "reference at {}:{} has an out-of-range length {}",
            entry.path, entry.offset, entry.len
        ))?;
        let range = entry.offset..end;
        if entry.len == 0 || range.end > document.text.len() {
            return Err(NavError::model(format!(
                "reference {:?} is outside of '{}'",
                range, entry.path
            )));
        }

        let overlaps_declaration = self.name_spans.iter().any(|(id, span)| {
            self.symbols[id].location.path == entry.path
                && span.start < range.end
                && range.start < span.end
        });
        if overlaps_declaration {
            return Err(NavError::model(format!(
                "reference {:?} in '{}' overlaps a declaration name",
                range, entry.path
            )));
        }

        self.references.push(Reference {
            path: entry.path,
            range,
            target: entry.target,
            qualifier: entry.qualifier,
        });
        Ok(())
    }

    fn declaration_at(&self, path: &str, offset: usize) -> Option<&Symbol> {
        self.order.iter().find_map(|id| {
            let symbol = &self.symbols[id];
            let span = &self.name_spans[id];
            (symbol.location.path == path && span.start <= offset && offset <= span.end)
                .then_some(symbol)
        })
    }

    fn reference_at(&self, path: &str, offset: usize) -> Option<&Reference> {
        self.references
            .iter()
            .find(|reference| reference.path == path && reference.contains(offset))
    }

    /// `name` is `ancestor` or inherits from it
    fn is_subtype(&self, name: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![name];
        while let Some(current) = pending.pop() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(supers) = self.supertypes.get(current) {
                pending.extend(supers.iter().map(String::as_str));
            }
        }
        false
    }
}

impl ProgramModel for InMemoryProgram {
    fn direct_implementors(&self, symbol: &SymbolId) -> NavResult<Vec<Symbol>> {
        let state = self.state.read();
        if !state.symbols.contains_key(symbol) {
            return Err(NavError::traversal_at(
                format!("symbol '{}' is no longer in the model", symbol),
                symbol.clone(),
            ));
        }
        Ok(state
            .implementors
            .get(symbol)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.symbols.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl AnchorResolver for InMemoryProgram {
    fn find_target(
        &self,
        document: &Document,
        offset: usize,
        flags: ResolveFlags,
    ) -> NavResult<Option<Symbol>> {
        let state = self.state.read();

        if flags.contains(ResolveFlags::ELEMENT_NAME_ACCEPTED) {
            if let Some(symbol) = state.declaration_at(&document.path, offset) {
                return Ok(Some(symbol.clone()));
            }
        }

        if flags.contains(ResolveFlags::REFERENCED_ELEMENT_ACCEPTED) {
            if let Some(reference) = state.reference_at(&document.path, offset) {
                let target = state.symbols.get(&reference.target).ok_or_else(|| {
                    NavError::resolution(format!(
                        "reference resolves to missing symbol '{}'",
                        reference.target
                    ))
                })?;
                return Ok(Some(target.clone()));
            }
        }

        // No completion lookup items exist in a static model
        Ok(None)
    }

    fn find_reference(&self, document: &Document, offset: usize) -> NavResult<Option<Reference>> {
        let state = self.state.read();
        Ok(state.reference_at(&document.path, offset).cloned())
    }
}

impl ReferenceAcceptor for InMemoryProgram {
    /// Unqualified references accept everything. A reference qualified with
    /// type `T` accepts its own target and candidates declared in `T` or in
    /// a subtype of `T`.
    fn accept_implementation_for_reference(
        &self,
        reference: Option<&Reference>,
        candidate: &Symbol,
    ) -> bool {
        let Some(reference) = reference else {
            return true;
        };
        let Some(qualifier) = &reference.qualifier else {
            return true;
        };
        if candidate.id == reference.target {
            return true;
        }

        let state = self.state.read();
        match &candidate.container {
            Some(container) => state.is_subtype(container, qualifier),
            // Types themselves: the candidate is the implementing type
            None => state.is_subtype(&candidate.name, qualifier),
        }
    }
}
