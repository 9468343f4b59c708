//! Expression type inference used during call resolution.
//!
//! Both inferrers dispatch on `node.kind()` strings rather than an
//! exhaustive AST enum (see the design note on heterogeneous tree-sitter
//! nodes) and share the same [`ExprContext`] input shape — a symbol table, a
//! local scope, and the file's source text — even though their dispatch
//! tables differ enough per language that sharing code beyond that shape
//! would cost more than it saves.

pub mod context;
pub use context::ExprContext;

pub mod java;
pub mod go;

mod heuristics;

#[cfg(test)]
#[path = "tests/java_tests.rs"]
mod java_tests;

#[cfg(test)]
#[path = "tests/go_tests.rs"]
mod go_tests;
