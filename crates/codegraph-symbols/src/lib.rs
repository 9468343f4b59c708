//! Cross-file symbol table and per-callable local scope tracking.
//!
//! The [`SymbolTable`] is populated during Phase 1 (the scanner) and is
//! read-only for the rest of the run; [`LocalScope`] is owned by the
//! resolver for the duration of a single callable body walk. Every
//! resolution query sorts its candidate set before picking — removing any of
//! those sort points would reintroduce hash-order nondeterminism into the
//! output, which is why `resolve_type` and `resolve_callable_with_receiver`
//! never short-circuit on `HashMap` iteration order.

pub mod table;
pub use table::{FileContext, SymbolTable};

pub mod scope;
pub use scope::LocalScope;

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod table_tests;

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod scope_tests;
