//! Implnav
//!
//! Facade over [`implnav_core`]: goto-implementation with an incremental,
//! cancellable background search.

pub use implnav_core::*;
