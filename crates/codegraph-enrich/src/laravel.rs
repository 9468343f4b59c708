//! Laravel routing semantics for PHP IR.
//!
//! Unlike the other three enrichers this one never touches tree-sitter: a
//! Laravel route file is PHP expression soup (`Route::get(...)`) that the
//! teacher's Java/Go AST walks have no equivalent for, so — matching the
//! reference implementation this was ported from — routes are recovered
//! with regexes over `routes/*.php` instead.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use walkdir::WalkDir;

use codegraph_adapter::Enricher;
use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;

use crate::util;

// The Rust `regex` crate guarantees linear-time matching and has no
// backreferences, unlike the Python `re` module the original patterns were
// written against; `(?P=q)` quote-matching is dropped in favor of accepting
// either quote character on each side independently, which every route file
// in practice satisfies since nobody mixes quote styles mid-literal.
static ROUTE_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)Route::(?P<method>get|post|put|patch|delete|options|any)\s*\(\s*['"](?P<path>[^'"]+)['"]\s*,\s*(?P<action>[^)]+)\)"#).unwrap()
});
static ARRAY_ACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[\s*(?P<class>[A-Za-z0-9_\\]+)::class\s*,\s*['"](?P<method>[A-Za-z0-9_]+)['"]\s*\]"#).unwrap());
static STRING_ACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"](?P<class>[A-Za-z0-9_\\]+)@(?P<method>[A-Za-z0-9_]+)['"]"#).unwrap());
static RESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)Route::(?P<kind>resource|apiResource)\s*\(\s*['"](?P<base>[^'"]+)['"]\s*,\s*(?P<class>[A-Za-z0-9_\\]+)::class"#).unwrap()
});

/// Zero-field: the route vocabulary this enricher recognizes is fixed.
/// Exists as a type for symmetry with [`crate::spring::SpringConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LaravelConfig;

#[derive(Default)]
pub struct LaravelEnricher {
    _config: LaravelConfig,
}

impl LaravelEnricher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Enricher for LaravelEnricher {
    fn name(&self) -> &'static str {
        "laravel"
    }

    fn supported_languages(&self) -> &'static [LanguageTag] {
        &[LanguageTag::Php]
    }

    fn enrich(&self, ir: &mut IrRoot, source_root: &Path) -> Result<(), AnalysisError> {
        let routes_dir = source_root.join("routes");
        if !routes_dir.is_dir() {
            return Ok(());
        }

        let type_id_by_qname: FxHashMap<String, String> = ir
            .types
            .iter()
            .filter(|t| t.language == LanguageTag::Php)
            .map(|t| (t.qualified_name.clone(), t.id.clone()))
            .collect();
        let type_idx_by_id: FxHashMap<String, usize> = ir.types.iter().enumerate().map(|(i, t)| (t.id.clone(), i)).collect();
        let mut type_qnames_by_name: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for t in ir.types.iter().filter(|t| t.language == LanguageTag::Php) {
            type_qnames_by_name.entry(t.simple_name.clone()).or_default().push(t.qualified_name.clone());
        }
        let callable_idx_by_id: FxHashMap<String, usize> = ir.callables.iter().enumerate().map(|(i, c)| (c.id.clone(), i)).collect();

        let mut route_files: Vec<_> = WalkDir::new(&routes_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            .map(|e| e.path().to_path_buf())
            .collect();
        route_files.sort();

        for route_file in route_files {
            let Ok(text) = std::fs::read_to_string(&route_file) else {
                tracing::warn!(path = %route_file.display(), "failed to read route file, skipping");
                continue;
            };
            apply_route_calls(&text, ir, &type_id_by_qname, &type_idx_by_id, &type_qnames_by_name, &callable_idx_by_id);
            apply_resource_routes(&text, ir, &type_id_by_qname, &type_idx_by_id, &type_qnames_by_name, &callable_idx_by_id);
        }

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_route_calls(
    text: &str,
    ir: &mut IrRoot,
    type_id_by_qname: &FxHashMap<String, String>,
    type_idx_by_id: &FxHashMap<String, usize>,
    type_qnames_by_name: &FxHashMap<String, Vec<String>>,
    callable_idx_by_id: &FxHashMap<String, usize>,
) {
    for caps in ROUTE_CALL_RE.captures_iter(text) {
        let method = caps["method"].to_uppercase();
        let path = &caps["path"];
        let action = &caps["action"];

        let Some((controller_class, controller_method)) = parse_action(action) else { continue };
        let Some(idx) = find_controller_callable_idx(
            ir,
            &controller_class,
            &controller_method,
            type_id_by_qname,
            type_idx_by_id,
            type_qnames_by_name,
            callable_idx_by_id,
        ) else {
            continue;
        };

        let route = format!("{method} {path}");
        util::merge_unique(&mut ir.callables[idx].routes, [route]);
        util::merge_unique(&mut ir.callables[idx].stereotypes, ["laravel:route".to_string()]);
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_resource_routes(
    text: &str,
    ir: &mut IrRoot,
    type_id_by_qname: &FxHashMap<String, String>,
    type_idx_by_id: &FxHashMap<String, usize>,
    type_qnames_by_name: &FxHashMap<String, Vec<String>>,
    callable_idx_by_id: &FxHashMap<String, usize>,
) {
    for caps in RESOURCE_RE.captures_iter(text) {
        let kind = caps["kind"].to_lowercase();
        let base = caps["base"].trim_matches('/').to_string();
        let controller_class = &caps["class"];

        for (method, path, action_method) in resource_route_matrix(&kind, &base) {
            let Some(idx) = find_controller_callable_idx(
                ir,
                controller_class,
                &action_method,
                type_id_by_qname,
                type_idx_by_id,
                type_qnames_by_name,
                callable_idx_by_id,
            ) else {
                continue;
            };
            let route = format!("{method} {path}");
            util::merge_unique(&mut ir.callables[idx].routes, [route]);
            util::merge_unique(&mut ir.callables[idx].stereotypes, ["laravel:route".to_string()]);
        }
    }
}

fn resource_route_matrix(kind: &str, base: &str) -> Vec<(&'static str, String, &'static str)> {
    let prefix = format!("/{base}");
    if kind == "apiresource" {
        vec![
            ("GET", prefix.clone(), "index"),
            ("POST", prefix.clone(), "store"),
            ("GET", format!("{prefix}/{{id}}"), "show"),
            ("PUT", format!("{prefix}/{{id}}"), "update"),
            ("PATCH", format!("{prefix}/{{id}}"), "update"),
            ("DELETE", format!("{prefix}/{{id}}"), "destroy"),
        ]
    } else {
        vec![
            ("GET", prefix.clone(), "index"),
            ("GET", format!("{prefix}/create"), "create"),
            ("POST", prefix.clone(), "store"),
            ("GET", format!("{prefix}/{{id}}"), "show"),
            ("GET", format!("{prefix}/{{id}}/edit"), "edit"),
            ("PUT", format!("{prefix}/{{id}}"), "update"),
            ("PATCH", format!("{prefix}/{{id}}"), "update"),
            ("DELETE", format!("{prefix}/{{id}}"), "destroy"),
        ]
    }
}

fn parse_action(action_text: &str) -> Option<(String, String)> {
    if let Some(caps) = ARRAY_ACTION_RE.captures(action_text) {
        return Some((caps["class"].to_string(), caps["method"].to_string()));
    }
    if let Some(caps) = STRING_ACTION_RE.captures(action_text) {
        return Some((caps["class"].to_string(), caps["method"].to_string()));
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn find_controller_callable_idx(
    ir: &IrRoot,
    controller_class: &str,
    controller_method: &str,
    type_id_by_qname: &FxHashMap<String, String>,
    type_idx_by_id: &FxHashMap<String, usize>,
    type_qnames_by_name: &FxHashMap<String, Vec<String>>,
    callable_idx_by_id: &FxHashMap<String, usize>,
) -> Option<usize> {
    let normalized_qname = controller_class.replace('\\', ".");
    let type_id = type_id_by_qname.get(&normalized_qname).cloned().or_else(|| {
        let short = normalized_qname.rsplit('.').next().unwrap_or(&normalized_qname);
        let candidates = type_qnames_by_name.get(short)?;
        if candidates.len() == 1 {
            type_id_by_qname.get(&candidates[0]).cloned()
        } else {
            None
        }
    })?;

    let type_idx = *type_idx_by_id.get(&type_id)?;
    let typ = &ir.types[type_idx];
    typ.callables.iter().find_map(|call_id| {
        let &idx = callable_idx_by_id.get(call_id)?;
        if ir.callables[idx].simple_name == controller_method {
            Some(idx)
        } else {
            None
        }
    })
}
