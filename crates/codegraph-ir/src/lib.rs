//! Language-neutral intermediate representation (IR) of a repository's
//! code topology: modules, types, callables, their structural relationships,
//! and the unresolved references left behind by call sites that could not be
//! statically bound.
//!
//! Variant entities (`Module`/`Type`/`Callable`/`UnresolvedReference`) are
//! kept as distinct record types in separate collections inside [`IrRoot`]
//! rather than folded into one tagged enum — callers consume them
//! independently (a graph-writer wants `Module`s and `Type`s; a diagnostics
//! reporter mostly wants `UnresolvedReference`s) and every relationship
//! between them is stored as an id, never an owning reference, so the model
//! has no cycles to worry about at the Rust ownership level.

pub mod model;
pub use model::{
    merge_all, Callable, CallableKind, IrRoot, Module, Relationship, Type, TypeKind,
    UnresolvedReference, Visibility,
};

pub mod validator;
pub use validator::{ValidationError, Validator};

#[cfg(test)]
mod tests;
