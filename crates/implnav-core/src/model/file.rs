//! On-disk program model format (JSON or TOML)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{NavError, NavResult};
use crate::model::{SymbolId, SymbolKind};

/// Serialized program model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramFile {
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
    #[serde(default)]
    pub symbols: Vec<SymbolEntry>,
    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// Source text of one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub path: String,
    pub text: String,
}

/// One declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub container: Option<String>,
    pub path: String,
    /// Byte offset of the declared name in the document text
    pub name_offset: usize,
    /// Symbols this declaration directly implements or overrides
    #[serde(default)]
    pub implements: Vec<SymbolId>,
    /// Overrides the kind-based default of the "include self" capability
    #[serde(default)]
    pub include_self: Option<bool>,
}

/// One use-site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub path: String,
    pub offset: usize,
    pub len: usize,
    pub target: SymbolId,
    #[serde(default)]
    pub qualifier: Option<String>,
}

/// Subtyping facts used to check qualified references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl ProgramFile {
    /// Load a program file, choosing the format from the extension.
    ///
    /// `.toml` is parsed as TOML, everything else as JSON.
    pub fn from_path(path: &Path) -> NavResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NavError::model_with_context(
                format!("Failed to read program model: {}", e),
                format!("Reading program model from '{}'", path.display()),
            )
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                NavError::model_with_context(
                    format!("Failed to parse TOML program model: {}", e),
                    format!("Deserializing '{}'", path.display()),
                )
            }),
            _ => serde_json::from_str(&content).map_err(|e| {
                NavError::model_with_context(
                    format!("Failed to parse JSON program model: {}", e),
                    format!("Deserializing '{}'", path.display()),
                )
            }),
        }
    }

    pub fn from_json_str(content: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
