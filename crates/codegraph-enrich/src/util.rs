//! Idempotence helpers shared by every enricher: merge-without-duplicating
//! for string lists, and a relationship dedup set seeded from whatever the
//! IR already carries so a second `enrich()` call is a no-op.

use indexmap::IndexSet;

use codegraph_ir::{IrRoot, Relationship};

/// Extends `target` with `values`, skipping anything already present.
/// Order is preserved: existing entries keep their position, new ones are
/// appended in the order they arrive.
pub fn merge_unique(target: &mut Vec<String>, values: impl IntoIterator<Item = String>) {
    let mut seen: IndexSet<String> = target.drain(..).collect();
    for value in values {
        seen.insert(value);
    }
    target.extend(seen);
}

pub type RelationshipKey = (String, String, String);

/// Snapshots the relationships already on `ir` so that relationships an
/// earlier `enrich()` call already recorded are never appended twice.
#[must_use]
pub fn seed_seen_relationships(ir: &IrRoot) -> IndexSet<RelationshipKey> {
    ir.relationships
        .iter()
        .map(|r| (r.source.clone(), r.kind.clone(), r.target.clone()))
        .collect()
}

pub fn add_relationship(
    ir: &mut IrRoot,
    source: &str,
    target: &str,
    kind: &str,
    seen: &mut IndexSet<RelationshipKey>,
) {
    let key = (source.to_string(), kind.to_string(), target.to_string());
    if !seen.insert(key) {
        return;
    }
    ir.relationships.push(Relationship {
        source: source.to_string(),
        target: target.to_string(),
        kind: kind.to_string(),
    });
}
