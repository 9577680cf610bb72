//! CLI commands

pub mod find;
pub mod symbols;
