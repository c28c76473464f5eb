//! talentdb-query
//!
//! Compiles validated search criteria into a single select-style query
//! expression plus the named inputs its vector and ranking clauses reference.
//! See `compiler` for how clause groups are chosen and combined, and `clauses`
//! for the predicate syntax.

pub mod clauses;
pub mod compiler;

pub use compiler::QueryCompiler;
