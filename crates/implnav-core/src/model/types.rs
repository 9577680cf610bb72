//! Symbol, reference and document types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Identity of a program element, unique within one program model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub String);

impl SymbolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymbolId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SymbolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Trait,
    Method,
    Function,
    Property,
    Field,
    Other,
}

impl SymbolKind {
    /// Kinds that may list themselves among their own implementations
    /// when the model does not say otherwise
    pub fn is_abstract_by_default(self) -> bool {
        matches!(self, Self::Interface | Self::Trait)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Method => "method",
            Self::Function => "function",
            Self::Property => "property",
            Self::Field => "field",
            Self::Other => "symbol",
        };
        f.write_str(name)
    }
}

/// Where a declaration lives (1-based line and column, byte offset)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// A program element: the anchor of a search or one of its candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub location: Location,
    /// Whether this element may appear among its own implementations
    #[serde(default)]
    pub include_self_in_implementations: bool,
}

impl Symbol {
    /// `name` qualified with its container, e.g. `Circle.area`
    pub fn qualified_name(&self) -> String {
        match &self.container {
            Some(container) => format!("{}.{}", container, self.name),
            None => self.name.clone(),
        }
    }
}

/// A use-site expression under the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub path: String,
    pub range: Range<usize>,
    /// Symbol the reference resolves to
    pub target: SymbolId,
    /// Static receiver type of a qualified reference (`shape.area()` -> `Shape`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl Reference {
    pub fn contains(&self, offset: usize) -> bool {
        self.range.start <= offset && offset <= self.range.end
    }
}

/// A source document the cursor lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Byte offset of a 1-based line/column pair, clamped to the line end
    pub fn offset_at(&self, line: u32, column: u32) -> Option<usize> {
        if line == 0 || column == 0 {
            return None;
        }
        let mut start = 0usize;
        for (index, text_line) in self.text.split_inclusive('\n').enumerate() {
            if index + 1 == line as usize {
                let content = text_line.trim_end_matches(['\n', '\r']);
                let column = (column as usize - 1).min(content.len());
                return Some(start + column);
            }
            start += text_line.len();
        }
        None
    }

    /// 1-based line/column of a byte offset
    pub fn line_column(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.text.len());
        let before = &self.text[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => offset - newline,
            None => offset + 1,
        };
        (line as u32, column as u32)
    }
}
