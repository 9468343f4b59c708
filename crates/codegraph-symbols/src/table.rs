//! The cross-file symbol table and its deterministic resolution algorithms.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

/// File-local resolution context: current package, explicit imports,
/// wildcard imports, and local type aliases (e.g. Go dot-imports, Java
/// single-type imports treated as aliases of themselves).
#[derive(Clone, Debug, Default)]
pub struct FileContext {
    pub package: String,
    /// Fully qualified names imported explicitly, in declaration order.
    pub imports: Vec<String>,
    /// Wildcard import prefixes *without* the trailing `.*`, e.g. `java.util`.
    pub wildcard_imports: Vec<String>,
    /// Local alias short-name -> fully qualified name, checked first.
    pub local_aliases: FxHashMap<String, String>,
}

impl FileContext {
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }
}

/// Aggregate counts, logged by adapters at the end of a scan. Never
/// consulted by resolution logic.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymbolTableStats {
    pub type_count: usize,
    pub callable_count: usize,
    pub overload_count: usize,
}

/// A single mutable collection, populated during Phase 1 and read-only
/// thereafter.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    /// short name -> ordered set of qualified names.
    types: FxHashMap<String, IndexSet<String>>,
    /// short name -> ordered set of qualified names (overloads share one entry).
    callables: FxHashMap<String, IndexSet<String>>,
    /// `"{qualified_name}#{signature}"` -> canonical signature string.
    callable_signatures: FxHashMap<String, String>,
    /// `"{qualified_name}#{signature}"` -> return type as written in source.
    callable_return_types: FxHashMap<String, String>,
    /// qualified_name -> every signature registered for it, in registration
    /// order. A secondary index over `callable_signatures` kept for the
    /// ambiguity fallback in `resolve_callable_with_receiver`, per the design
    /// note allowing a two-level map as long as behavior matches.
    overloads_by_qualified_name: FxHashMap<String, Vec<String>>,
    /// (owner qualified name, field name) -> field type.
    field_types: FxHashMap<(String, String), String>,
    /// qualified name -> ordered list of supertype qualified names.
    type_hierarchy: FxHashMap<String, Vec<String>>,
    /// qualified name -> module id.
    modules: FxHashMap<String, String>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- registration (Phase 1 only) ----------------------------------

    pub fn register_type(&mut self, short_name: &str, qualified_name: &str) {
        self.types
            .entry(short_name.to_string())
            .or_default()
            .insert(qualified_name.to_string());
    }

    /// Registers a callable declaration. If another callable with the same
    /// qualified name already exists with a *different* signature, this adds
    /// an overload entry rather than replacing it.
    pub fn register_callable(
        &mut self,
        short_name: &str,
        qualified_name: &str,
        signature: &str,
        return_type: Option<&str>,
    ) {
        self.callables
            .entry(short_name.to_string())
            .or_default()
            .insert(qualified_name.to_string());

        let key = signature_key(qualified_name, signature);
        self.callable_signatures
            .entry(key.clone())
            .or_insert_with(|| signature.to_string());
        if let Some(rt) = return_type {
            self.callable_return_types
                .entry(key)
                .or_insert_with(|| rt.to_string());
        }

        let sigs = self
            .overloads_by_qualified_name
            .entry(qualified_name.to_string())
            .or_default();
        if !sigs.iter().any(|s| s == signature) {
            sigs.push(signature.to_string());
        }
    }

    pub fn register_field(&mut self, owner_qualified_name: &str, field_name: &str, field_type: &str) {
        self.field_types.insert(
            (owner_qualified_name.to_string(), field_name.to_string()),
            field_type.to_string(),
        );
    }

    /// Records type-hierarchy edges (`extends`/`implements`/`embeds`), order
    /// matching the order they appeared in source.
    pub fn register_supertypes(&mut self, qualified_name: &str, supertypes: Vec<String>) {
        self.type_hierarchy
            .entry(qualified_name.to_string())
            .or_default()
            .extend(supertypes);
    }

    pub fn register_module(&mut self, qualified_name: &str, module_id: &str) {
        self.modules
            .insert(qualified_name.to_string(), module_id.to_string());
    }

    // ---- read-only queries (Phase 2) -----------------------------------

    #[must_use]
    pub fn supertypes(&self, qualified_name: &str) -> &[String] {
        self.type_hierarchy
            .get(qualified_name)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn field_type(&self, owner_qualified_name: &str, field_name: &str) -> Option<&str> {
        self.field_types
            .get(&(owner_qualified_name.to_string(), field_name.to_string()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn module_id(&self, qualified_name: &str) -> Option<&str> {
        self.modules.get(qualified_name).map(String::as_str)
    }

    #[must_use]
    pub fn signature_of(&self, qualified_name: &str, signature: &str) -> Option<&str> {
        self.callable_signatures
            .get(&signature_key(qualified_name, signature))
            .map(String::as_str)
    }

    #[must_use]
    pub fn return_type_of(&self, qualified_name: &str, signature: &str) -> Option<&str> {
        self.callable_return_types
            .get(&signature_key(qualified_name, signature))
            .map(String::as_str)
    }

    /// Every signature registered under `qualified_name`, registration order.
    #[must_use]
    pub fn overloads_of(&self, qualified_name: &str) -> &[String] {
        self.overloads_by_qualified_name
            .get(qualified_name)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn stats(&self) -> SymbolTableStats {
        SymbolTableStats {
            type_count: self.types.values().map(IndexSet::len).sum(),
            callable_count: self.callables.len(),
            overload_count: self.overloads_by_qualified_name.values().map(Vec::len).sum(),
        }
    }

    /// Resolution order, each step returning on first hit:
    ///
    /// Order, each step returning on first hit: local alias, same-package
    /// qualified name, explicit imports, wildcard imports, then "exactly one
    /// candidate overall". Returns `None` on a miss — including the
    /// ambiguous case, which this table never picks arbitrarily.
    #[must_use]
    pub fn resolve_type(&self, short_name: &str, ctx: &FileContext) -> Option<String> {
        if let Some(aliased) = ctx.local_aliases.get(short_name) {
            return Some(aliased.clone());
        }

        let candidates = sorted_candidates(self.types.get(short_name))?;

        if !ctx.package.is_empty() {
            let same_package = format!("{}.{}", ctx.package, short_name);
            if candidates.iter().any(|c| *c == &same_package) {
                return Some(same_package);
            }
        }

        let suffix = format!(".{short_name}");
        for import in &ctx.imports {
            if import.ends_with(&suffix) && candidates.iter().any(|c| *c == import) {
                return Some(import.clone());
            }
        }

        for wildcard in &ctx.wildcard_imports {
            let prefix = format!("{wildcard}.");
            if let Some(hit) = candidates
                .iter()
                .find(|c| c.starts_with(&prefix) && c.ends_with(&suffix))
            {
                return Some((*hit).clone());
            }
        }

        if candidates.len() == 1 {
            return Some(candidates[0].clone());
        }

        None
    }

    /// Resolves a method call given its receiver type and optional signature.
    ///
    /// Returns `Ok(callee_qualified_name)` on a unique match, `Err(reason)`
    /// using the closed reason vocabulary the resolver expects otherwise.
    pub fn resolve_callable_with_receiver(
        &self,
        method_name: &str,
        receiver_type: Option<&str>,
        signature: Option<&str>,
    ) -> Result<String, String> {
        let receiver_type = receiver_type.ok_or_else(|| "Unknown receiver type".to_string())?;

        let candidates = sorted_candidates(self.callables.get(method_name))
            .ok_or_else(|| format!("Method not found: {method_name}"))?;

        let mut types_to_check = vec![receiver_type.to_string()];
        types_to_check.extend(self.supertypes(receiver_type).iter().cloned());

        let mut matching: Vec<String> = Vec::new();
        for owner_type in &types_to_check {
            let prefix = format!("{owner_type}.");
            for candidate in &candidates {
                if candidate.starts_with(&prefix) && !matching.iter().any(|m| m == *candidate) {
                    matching.push((*candidate).clone());
                }
            }
        }
        matching.sort();
        matching.dedup();

        if matching.is_empty() {
            return Err(format!("Method not found on type {receiver_type}"));
        }

        let Some(signature) = signature else {
            return match matching.len() {
                1 => Ok(matching.into_iter().next().unwrap()),
                n => Err(format!("Ambiguous: {n} candidates")),
            };
        };

        let exact: Vec<&String> = matching
            .iter()
            .filter(|c| self.signature_of(c, signature).is_some())
            .collect();
        match exact.len() {
            1 => return Ok(exact[0].clone()),
            n if n > 1 => return Err(format!("Ambiguous: {n} candidates")),
            _ => {}
        }

        let declaring: Vec<&String> = matching
            .iter()
            .filter(|c| self.overloads_of(c).iter().any(|s| s == signature))
            .collect();
        match declaring.len() {
            1 => Ok(declaring[0].clone()),
            n if n > 1 => Err(format!("Ambiguous: {n} candidates")),
            _ => Err(format!("Method not found on type {receiver_type}")),
        }
    }
}

fn signature_key(qualified_name: &str, signature: &str) -> String {
    format!("{qualified_name}#{signature}")
}

fn sorted_candidates(set: Option<&IndexSet<String>>) -> Option<Vec<&String>> {
    let set = set?;
    if set.is_empty() {
        return None;
    }
    let mut v: Vec<&String> = set.iter().collect();
    v.sort();
    Some(v)
}
