//! Anchor resolution contract
//!
//! Maps a cursor position to the symbol whose implementations are wanted.
//! Resolution itself belongs to the host (an index, a language server, the
//! in-memory model); this module only fixes the flags and the questions the
//! pipeline asks.

use std::fmt;
use std::ops::{BitOr, Sub};

use crate::error::NavResult;
use crate::model::{Document, Reference, Symbol};

/// Which kinds of cursor targets a resolution may return
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResolveFlags(u8);

impl ResolveFlags {
    /// Cursor on a declaration's own name
    pub const ELEMENT_NAME_ACCEPTED: Self = Self(0b001);
    /// Cursor on a reference; resolve to what it points at
    pub const REFERENCED_ELEMENT_ACCEPTED: Self = Self(0b010);
    /// Cursor on a completion lookup item
    pub const LOOKUP_ITEM_ACCEPTED: Self = Self(0b100);

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Full flag set used to find the anchor of an implementation search
    pub const fn implementation_search() -> Self {
        Self(
            Self::ELEMENT_NAME_ACCEPTED.0
                | Self::REFERENCED_ELEMENT_ACCEPTED.0
                | Self::LOOKUP_ITEM_ACCEPTED.0,
        )
    }

    /// Restricted set that only matches declarations: an anchor found with the
    /// full set but not with this one sits on a use-site
    pub const fn declarations_only() -> Self {
        Self(
            Self::implementation_search().0
                & !(Self::REFERENCED_ELEMENT_ACCEPTED.0 | Self::LOOKUP_ITEM_ACCEPTED.0),
        )
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ResolveFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Sub for ResolveFlags {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl fmt::Debug for ResolveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::ELEMENT_NAME_ACCEPTED) {
            names.push("ELEMENT_NAME");
        }
        if self.contains(Self::REFERENCED_ELEMENT_ACCEPTED) {
            names.push("REFERENCED_ELEMENT");
        }
        if self.contains(Self::LOOKUP_ITEM_ACCEPTED) {
            names.push("LOOKUP_ITEM");
        }
        write!(f, "ResolveFlags({})", names.join(" | "))
    }
}

/// Resolves cursor positions against the program model.
///
/// Implementations must be side-effect-free and take the model's read scope
/// for the duration of each call; they may be called from the interactive
/// path or from the search worker.
pub trait AnchorResolver: Send + Sync {
    /// Symbol at `offset` matching `flags`, or `None` when there is nothing
    fn find_target(
        &self,
        document: &Document,
        offset: usize,
        flags: ResolveFlags,
    ) -> NavResult<Option<Symbol>>;

    /// Reference expression at `offset`, `None` on a declaration or whitespace
    fn find_reference(&self, document: &Document, offset: usize) -> NavResult<Option<Reference>>;
}

/// Result of resolving the cursor for one invocation
#[derive(Debug, Clone)]
pub struct ResolvedAnchor {
    pub anchor: Symbol,
    pub reference: Option<Reference>,
    /// The cursor sits on a use-site rather than on the declaration
    pub on_reference: bool,
}

/// Resolve the anchor, the originating reference and whether the cursor is on
/// a use-site. `Ok(None)` means there is nothing to search for.
pub fn resolve_anchor(
    resolver: &dyn AnchorResolver,
    document: &Document,
    offset: usize,
) -> NavResult<Option<ResolvedAnchor>> {
    let Some(anchor) =
        resolver.find_target(document, offset, ResolveFlags::implementation_search())?
    else {
        return Ok(None);
    };

    let on_reference = resolver
        .find_target(document, offset, ResolveFlags::declarations_only())?
        .is_none();
    let reference = resolver.find_reference(document, offset)?;

    Ok(Some(ResolvedAnchor {
        anchor,
        reference,
        on_reference,
    }))
}
