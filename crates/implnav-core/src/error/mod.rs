//! Error types for implementation search
//!
//! Clean aborts (no symbol at the cursor, nothing to show) are not errors and
//! surface as `Ok(None)`. A list closed by the user is a cancelled task, not an
//! error either. What remains here are the faults that must propagate.

mod constructors;
mod conversions;
mod types;

pub use types::{NavError, NavResult, OptionExt};
