//! The IR entity types and [`IrRoot`], their flat-collection owner.

use codegraph_common::LanguageTag;
use serde::{Deserialize, Serialize};

/// A namespace or package boundary.
///
/// Created once per unique `(project, language, qualified_name)` during
/// resolution; never mutated after phase 2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub simple_name: String,
    pub qualified_name: String,
    /// Filesystem path, relative to the scanned source root.
    pub path: String,
    pub language: LanguageTag,
    pub declared_types: Vec<String>,
    pub sub_modules: Vec<String>,
}

/// The kind of a [`Type`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Trait,
}

/// A class, interface, struct, trait, or enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub id: String,
    pub simple_name: String,
    pub qualified_name: String,
    pub kind: TypeKind,
    pub language: LanguageTag,
    /// Raw textual modifiers: access, abstract, final, static, exported, ...
    pub modifiers: Vec<String>,
    /// Raw annotation names, best-effort.
    pub annotations: Vec<String>,
    /// Framework tags attached by enrichers, e.g. `spring:controller`.
    pub stereotypes: Vec<String>,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub embeds: Vec<String>,
    pub callables: Vec<String>,
}

impl Type {
    /// All supertype/interface/embed ids in source order, the order
    /// `resolve_callable_with_receiver` walks when checking inherited
    /// members.
    #[must_use]
    pub fn supertype_ids(&self) -> impl Iterator<Item = &str> {
        self.extends
            .iter()
            .chain(self.implements.iter())
            .chain(self.embeds.iter())
            .map(String::as_str)
    }
}

/// The kind of a [`Callable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallableKind {
    Function,
    Method,
    Constructor,
}

/// Visibility of a [`Callable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    /// Java package-private / Go lower-case-initial.
    Package,
}

/// A function, method, or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    pub id: String,
    pub simple_name: String,
    pub qualified_name: String,
    pub kind: CallableKind,
    pub language: LanguageTag,
    /// Canonical parameter-type list string, e.g. `(String, int)`.
    pub signature: String,
    pub is_static: bool,
    pub visibility: Visibility,
    pub return_type: Option<String>,
    pub annotations: Vec<String>,
    pub stereotypes: Vec<String>,
    /// Route strings, e.g. `"GET /users/{id}"`, attached by enrichers.
    pub routes: Vec<String>,
    pub calls: Vec<String>,
    pub overrides: Option<String>,
}

/// A call site that could not be bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub source_callable: String,
    pub target_name: String,
    pub context: Option<String>,
    /// One of the closed vocabulary of reasons (see the error-handling
    /// design): `"Function not found in symbol table"`,
    /// `"Method not found: <name>"`, `"Method not found on type <T>"`,
    /// `"Unknown receiver type"`, `"Unknown receiver type from method call"`,
    /// `"Ambiguous: N candidates"`.
    pub reason: String,
}

/// A semantic edge added by an enricher, not intrinsic to the language's own
/// syntax — e.g. `INJECTS`, `PERSISTS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub kind: String,
}

/// Owns the four IR collections plus a version string and an aggregate
/// language tag that is informational only — callers must never trust it
/// over an individual entity's own tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrRoot {
    pub version: String,
    /// Informational only. A polyglot repository's merged IR may carry any
    /// one of its constituent languages here; do not use it to decide how
    /// to interpret an entity — use the entity's own `language` field.
    pub aggregate_language: Option<LanguageTag>,
    pub modules: Vec<Module>,
    pub types: Vec<Type>,
    pub callables: Vec<Callable>,
    pub unresolved_references: Vec<UnresolvedReference>,
    pub relationships: Vec<Relationship>,
}

impl IrRoot {
    #[must_use]
    pub fn new(version: impl Into<String>, aggregate_language: LanguageTag) -> Self {
        Self {
            version: version.into(),
            aggregate_language: Some(aggregate_language),
            modules: Vec::new(),
            types: Vec::new(),
            callables: Vec::new(),
            unresolved_references: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Unions `self` and `other`'s collections. `modules`/`types`/`callables`
    /// are keyed by id, with `other`'s entry winning on collision;
    /// `relationships`/`unresolved_references` have no identity and are
    /// simply concatenated. Every entity keeps its own language tag; the
    /// aggregate tag of `self` is kept as-is (it is informational, so there
    /// is no "correct" choice when merging two different languages).
    #[must_use]
    pub fn merge(mut self, other: IrRoot) -> IrRoot {
        self.modules = merge_by_id(self.modules, other.modules, |m| &m.id);
        self.types = merge_by_id(self.types, other.types, |t| &t.id);
        self.callables = merge_by_id(self.callables, other.callables, |c| &c.id);
        self.unresolved_references
            .extend(other.unresolved_references);
        self.relationships.extend(other.relationships);
        self
    }

    /// Serializes to pretty JSON. Not a versioned wire format — just enough
    /// to make the serialize/deserialize round trip testable.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<IrRoot> {
        serde_json::from_str(s)
    }
}

/// Unions two id-keyed collections, later entries winning on a duplicate id.
/// `IndexMap` keeps a key's original position on overwrite, so merge order
/// stays stable across repeated merges.
fn merge_by_id<T>(first: Vec<T>, second: Vec<T>, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    let mut by_id: indexmap::IndexMap<String, T> =
        indexmap::IndexMap::with_capacity(first.len() + second.len());
    for item in first.into_iter().chain(second) {
        by_id.insert(id_of(&item).to_string(), item);
    }
    by_id.into_values().collect()
}

/// Folds a sequence of per-language IRs into one, preserving every entity's
/// own language tag. Used by the orchestrator after each [`crate`]-external
/// `LanguageAdapter::analyze` call returns.
#[must_use]
pub fn merge_all(irs: impl IntoIterator<Item = IrRoot>) -> IrRoot {
    let mut iter = irs.into_iter();
    let Some(first) = iter.next() else {
        return IrRoot::default();
    };
    iter.fold(first, IrRoot::merge)
}
