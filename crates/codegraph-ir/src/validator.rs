//! Reference-integrity checking over a built [`IrRoot`].
//!
//! The validator only reads; it never mutates the IR and never panics on a
//! dangling id — a dangling reference is reported as one [`ValidationError`]
//! per occurrence, naming the owning entity and the offending field.

use rustc_hash::FxHashSet;

use crate::model::IrRoot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// Id of the entity that holds the dangling reference.
    pub owner_id: String,
    /// The field the dangling id was found in, e.g. `"extends"`, `"calls"`.
    pub field: &'static str,
    /// The id that does not exist in the IR.
    pub target_id: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} references nonexistent id {}",
            self.owner_id, self.field, self.target_id
        )
    }
}

#[derive(Default)]
pub struct Validator;

impl Validator {
    #[must_use]
    pub fn validate(&self, ir: &IrRoot) -> Vec<ValidationError> {
        let mut known: FxHashSet<&str> = FxHashSet::default();
        known.extend(ir.modules.iter().map(|m| m.id.as_str()));
        known.extend(ir.types.iter().map(|t| t.id.as_str()));
        known.extend(ir.callables.iter().map(|c| c.id.as_str()));

        let mut errors = Vec::new();

        for module in &ir.modules {
            check_all(&mut errors, &module.id, "declared_types", &module.declared_types, &known);
            check_all(&mut errors, &module.id, "sub_modules", &module.sub_modules, &known);
            if module.sub_modules.iter().any(|s| s == &module.id) {
                errors.push(ValidationError {
                    owner_id: module.id.clone(),
                    field: "sub_modules",
                    target_id: module.id.clone(),
                });
            }
        }

        for ty in &ir.types {
            check_all(&mut errors, &ty.id, "extends", &ty.extends, &known);
            check_all(&mut errors, &ty.id, "implements", &ty.implements, &known);
            check_all(&mut errors, &ty.id, "embeds", &ty.embeds, &known);
            check_all(&mut errors, &ty.id, "callables", &ty.callables, &known);
        }

        for callable in &ir.callables {
            check_all(&mut errors, &callable.id, "calls", &callable.calls, &known);
            if let Some(overrides) = &callable.overrides {
                check_one(&mut errors, &callable.id, "overrides", overrides, &known);
            }
            if let Some(return_type) = &callable.return_type {
                check_one(&mut errors, &callable.id, "return_type", return_type, &known);
            }
        }

        for rel in &ir.relationships {
            check_one(&mut errors, &rel.source, "relationship.source", &rel.source, &known);
            check_one(&mut errors, &rel.source, "relationship.target", &rel.target, &known);
        }

        errors
    }
}

fn check_one(
    errors: &mut Vec<ValidationError>,
    owner_id: &str,
    field: &'static str,
    target_id: &str,
    known: &FxHashSet<&str>,
) {
    if !known.contains(target_id) {
        errors.push(ValidationError {
            owner_id: owner_id.to_string(),
            field,
            target_id: target_id.to_string(),
        });
    }
}

fn check_all(
    errors: &mut Vec<ValidationError>,
    owner_id: &str,
    field: &'static str,
    target_ids: &[String],
    known: &FxHashSet<&str>,
) {
    for target_id in target_ids {
        check_one(errors, owner_id, field, target_id, known);
    }
}
