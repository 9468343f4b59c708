//! Per-callable local variable scope.

use rustc_hash::FxHashMap;

/// A mutable, copyable map of variable name -> type name, owned by the
/// resolver for the duration of a single callable body walk.
///
/// `copy()` produces an independent snapshot for nested blocks, for/if/try
/// branches, and closures — modifications to a child scope never leak back
/// to the parent, because `copy()` is a full `Clone`, not a shared reference.
#[derive(Clone, Debug, Default)]
pub struct LocalScope {
    bindings: FxHashMap<String, String>,
}

impl LocalScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.bindings.insert(name.into(), type_name.into());
    }

    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// An independent snapshot. Mutating the returned scope never affects
    /// `self`.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }
}
