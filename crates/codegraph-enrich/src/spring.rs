//! Spring / Spring Boot semantic enrichment for Java IR.
//!
//! Re-parses every `.java` file under the source root (a second pass,
//! independent of the scanner/resolver phases) looking for stereotype and
//! route annotations, `@Autowired`/`@Inject`/`@Resource` injection points,
//! and `JpaRepository`-family supertypes. Everything found is matched back
//! to already-resolved IR entities by qualified name; nothing new is
//! created.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use tree_sitter::{Node, Parser};
use walkdir::WalkDir;

use codegraph_adapter::Enricher;
use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;
use codegraph_lang_java::ast as java_ast;

use crate::util::{self, RelationshipKey};

const TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

const COMPONENT_ANNOTATIONS: &[&str] = &[
    "Component",
    "Service",
    "Repository",
    "Controller",
    "RestController",
    "Configuration",
    "SpringBootApplication",
];
const CONTROLLER_ANNOTATIONS: &[&str] = &["Controller", "RestController"];
const INJECTION_ANNOTATIONS: &[&str] = &["Autowired", "Inject", "Resource"];
const BEAN_ANNOTATIONS: &[&str] = &["Bean"];
const ENTITY_ANNOTATIONS: &[&str] = &["Entity"];
const JPA_REPOSITORY_BASES: &[&str] = &["JpaRepository", "CrudRepository", "PagingAndSortingRepository"];
const REQUEST_MAPPING: &str = "RequestMapping";

fn route_annotation_method(name: &str) -> Option<&'static str> {
    match name {
        "GetMapping" => Some("GET"),
        "PostMapping" => Some("POST"),
        "PutMapping" => Some("PUT"),
        "DeleteMapping" => Some("DELETE"),
        "PatchMapping" => Some("PATCH"),
        _ => None,
    }
}

static REQUEST_METHOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"RequestMethod\.([A-Z]+)").unwrap());
static STRING_LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""((?:\\.|[^"\\])*)""#).unwrap());
static ANNOTATION_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_.]+)").unwrap());
static MAPPING_VALUE_OR_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?:value|path)\s*=\s*(\{[^}]*\}|"(?:\\.|[^"\\])*")"#).unwrap());
static ARG_KEY_ASSIGN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\s*=").unwrap());
static GENERIC_FIRST_ARG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\s*([A-Za-z_][A-Za-z0-9_.]*)").unwrap());

/// Presently zero-field: the annotation and route-macro vocabularies this
/// enricher understands are fixed. Exists as a type for symmetry with
/// [`crate::gin::GinConfig`]/[`crate::fiber::FiberConfig`] and so a future
/// caller has somewhere to add a custom stereotype table.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpringConfig;

#[derive(Default)]
pub struct SpringEnricher {
    _config: SpringConfig,
}

impl SpringEnricher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Enricher for SpringEnricher {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn supported_languages(&self) -> &'static [LanguageTag] {
        &[LanguageTag::Java]
    }

    fn enrich(&self, ir: &mut IrRoot, source_root: &Path) -> Result<(), AnalysisError> {
        let type_id_by_qname: FxHashMap<String, String> = ir
            .types
            .iter()
            .filter(|t| t.language == LanguageTag::Java)
            .map(|t| (t.qualified_name.clone(), t.id.clone()))
            .collect();
        let type_idx_by_qname: FxHashMap<String, usize> = ir
            .types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.language == LanguageTag::Java)
            .map(|(i, t)| (t.qualified_name.clone(), i))
            .collect();
        let mut type_qnames_by_name: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for t in ir.types.iter().filter(|t| t.language == LanguageTag::Java) {
            type_qnames_by_name.entry(t.simple_name.clone()).or_default().push(t.qualified_name.clone());
        }
        let callable_idx_by_key: FxHashMap<(String, String), usize> = ir
            .callables
            .iter()
            .enumerate()
            .filter(|(_, c)| c.language == LanguageTag::Java)
            .map(|(i, c)| ((c.qualified_name.clone(), c.signature.clone()), i))
            .collect();

        let ctx = LookupTables {
            type_id_by_qname,
            type_idx_by_qname,
            type_qnames_by_name,
            callable_idx_by_key,
        };
        let mut seen_relationships = util::seed_seen_relationships(ir);

        let mut parser = Parser::new();
        if parser.set_language(&tree_sitter_java::LANGUAGE.into()).is_err() {
            return Ok(());
        }

        for path in collect_java_files(source_root) {
            let Ok(source) = fs::read_to_string(&path) else {
                tracing::warn!(path = %path.display(), "failed to read file, skipping");
                continue;
            };
            let Some(tree) = parser.parse(&source, None) else {
                continue;
            };
            let root = tree.root_node();
            let package_name = java_ast::package_name(root, &source);
            let (explicit_imports, wildcard_imports) = java_ast::imports(root, &source);
            let file = FileInfo { source: &source, package_name, explicit_imports, wildcard_imports };

            walk_types(root, &file, None, &ctx, ir, &mut seen_relationships);
        }

        Ok(())
    }
}

fn collect_java_files(source_root: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<std::path::PathBuf> = WalkDir::new(source_root)
        .into_iter()
        .filter_entry(|e| {
            e.file_type().is_file()
                || !codegraph_common::limits::SKIPPED_DIRECTORY_NAMES
                    .contains(&e.file_name().to_string_lossy().as_ref())
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "java"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

struct LookupTables {
    type_id_by_qname: FxHashMap<String, String>,
    type_idx_by_qname: FxHashMap<String, usize>,
    type_qnames_by_name: FxHashMap<String, Vec<String>>,
    callable_idx_by_key: FxHashMap<(String, String), usize>,
}

struct FileInfo<'a> {
    source: &'a str,
    package_name: String,
    explicit_imports: Vec<String>,
    wildcard_imports: Vec<String>,
}

fn walk_types(
    node: Node,
    file: &FileInfo,
    parent_qname: Option<&str>,
    ctx: &LookupTables,
    ir: &mut IrRoot,
    seen: &mut indexmap::IndexSet<RelationshipKey>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if TYPE_DECL_KINDS.contains(&child.kind()) {
            let Some(name_node) = child.child_by_field_name("name") else { continue };
            let type_name = java_ast::text(name_node, file.source);
            let qualified_name = match parent_qname {
                Some(parent) => format!("{parent}.{type_name}"),
                None if !file.package_name.is_empty() => format!("{}.{type_name}", file.package_name),
                None => type_name.to_string(),
            };

            let annotation_texts = annotation_texts_of(child, file.source);
            let raw_annotations: Vec<String> =
                annotation_texts.iter().filter_map(|t| annotation_name_from_text(t)).collect();

            if let Some(&idx) = ctx.type_idx_by_qname.get(&qualified_name) {
                util::merge_unique(&mut ir.types[idx].annotations, raw_annotations.clone());
                util::merge_unique(&mut ir.types[idx].stereotypes, stereotypes_for_type(&raw_annotations));

                let class_prefixes = extract_request_mapping_prefixes(&annotation_texts);
                let owner_type_id = ir.types[idx].id.clone();

                if let Some(body) = child.child_by_field_name("body") {
                    process_members(body, file, &qualified_name, &owner_type_id, &class_prefixes, ctx, ir, seen);
                    walk_types(body, file, Some(&qualified_name), ctx, ir, seen);
                }
            }
        } else if matches!(child.kind(), "class_body" | "interface_body" | "enum_body") {
            walk_types(child, file, parent_qname, ctx, ir, seen);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn process_members(
    body: Node,
    file: &FileInfo,
    owner_qname: &str,
    owner_type_id: &str,
    class_prefixes: &[String],
    ctx: &LookupTables,
    ir: &mut IrRoot,
    seen: &mut indexmap::IndexSet<RelationshipKey>,
) {
    let mut cursor = body.walk();
    let children: Vec<Node> = body.named_children(&mut cursor).collect();
    let single_ctor = children.iter().filter(|c| c.kind() == "constructor_declaration").count() == 1;

    for child in &children {
        match child.kind() {
            "field_declaration" => process_field_injection(*child, file, owner_type_id, ctx, ir, seen),
            "constructor_declaration" => {
                process_constructor_injection(*child, file, single_ctor, owner_type_id, ctx, ir, seen);
            }
            "method_declaration" => {
                process_method_semantics(*child, file, owner_qname, class_prefixes, ctx, ir, seen);
            }
            "class_body" | "interface_body" | "enum_body" => {
                process_members(*child, file, owner_qname, owner_type_id, class_prefixes, ctx, ir, seen);
            }
            _ => {}
        }
    }

    if let Some(decl) = body.parent() {
        for entity_name in jpa_repository_entity_names(decl, file.source) {
            if let Some(entity_id) = resolve_type_id(&entity_name, file, ctx) {
                util::add_relationship(ir, owner_type_id, &entity_id, "PERSISTS", seen);
            }
        }
    }
}

fn process_field_injection(
    field_node: Node,
    file: &FileInfo,
    owner_type_id: &str,
    ctx: &LookupTables,
    ir: &mut IrRoot,
    seen: &mut indexmap::IndexSet<RelationshipKey>,
) {
    let annotations: HashSet<String> = annotation_texts_of(field_node, file.source)
        .iter()
        .filter_map(|t| annotation_name_from_text(t))
        .collect();
    if !INJECTION_ANNOTATIONS.iter().any(|a| annotations.contains(*a)) {
        return;
    }
    let Some(type_node) = field_node.child_by_field_name("type") else { return };
    let injected_type_name = java_ast::raw_type_name(type_node, file.source);
    if let Some(dep_id) = resolve_type_id(&injected_type_name, file, ctx) {
        util::add_relationship(ir, owner_type_id, &dep_id, "INJECTS", seen);
    }
}

fn process_constructor_injection(
    ctor_node: Node,
    file: &FileInfo,
    single_ctor: bool,
    owner_type_id: &str,
    ctx: &LookupTables,
    ir: &mut IrRoot,
    seen: &mut indexmap::IndexSet<RelationshipKey>,
) {
    let annotations: HashSet<String> = annotation_texts_of(ctor_node, file.source)
        .iter()
        .filter_map(|t| annotation_name_from_text(t))
        .collect();
    let Some(params_node) = ctor_node.child_by_field_name("parameters") else { return };
    let mut pcursor = params_node.walk();
    let params: Vec<Node> = params_node
        .named_children(&mut pcursor)
        .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
        .collect();

    let is_injection_ctor = INJECTION_ANNOTATIONS.iter().any(|a| annotations.contains(*a)) || (single_ctor && !params.is_empty());
    if !is_injection_ctor {
        return;
    }

    for param in params {
        let Some(type_node) = param.child_by_field_name("type") else { continue };
        let dep_type_name = java_ast::raw_type_name(type_node, file.source);
        if let Some(dep_id) = resolve_type_id(&dep_type_name, file, ctx) {
            util::add_relationship(ir, owner_type_id, &dep_id, "INJECTS", seen);
        }
    }
}

fn process_method_semantics(
    method_node: Node,
    file: &FileInfo,
    owner_qname: &str,
    class_prefixes: &[String],
    ctx: &LookupTables,
    ir: &mut IrRoot,
    seen: &mut indexmap::IndexSet<RelationshipKey>,
) {
    let Some(name_node) = method_node.child_by_field_name("name") else { return };
    let method_name = java_ast::text(name_node, file.source);
    let Some(params_node) = method_node.child_by_field_name("parameters") else { return };
    let signature = java_ast::canonical_signature(params_node, file.source);
    let qualified_name = format!("{owner_qname}.{method_name}");

    let annotation_texts = annotation_texts_of(method_node, file.source);
    let raw_annotations: Vec<String> =
        annotation_texts.iter().filter_map(|t| annotation_name_from_text(t)).collect();

    let callable_idx = ctx.callable_idx_by_key.get(&(qualified_name, signature)).copied();

    if let Some(idx) = callable_idx {
        util::merge_unique(&mut ir.callables[idx].annotations, raw_annotations.clone());

        let routes = extract_routes_from_texts(&annotation_texts);
        if !routes.is_empty() {
            let expanded = expand_routes_with_prefixes(class_prefixes, &routes);
            util::merge_unique(&mut ir.callables[idx].routes, expanded);
            util::merge_unique(&mut ir.callables[idx].stereotypes, vec!["spring:route".to_string()]);
        }
    }

    if BEAN_ANNOTATIONS.iter().any(|a| raw_annotations.iter().any(|r| r == a)) {
        let Some(owner_type_id) = owner_type_id_for(owner_qname, ctx) else { return };
        if let Some(params_node) = method_node.child_by_field_name("parameters") {
            let mut cursor = params_node.walk();
            for param in params_node.named_children(&mut cursor) {
                if !matches!(param.kind(), "formal_parameter" | "spread_parameter") {
                    continue;
                }
                let Some(type_node) = param.child_by_field_name("type") else { continue };
                let dep_type_name = java_ast::raw_type_name(type_node, file.source);
                if let Some(dep_id) = resolve_type_id(&dep_type_name, file, ctx) {
                    util::add_relationship(ir, &owner_type_id, &dep_id, "INJECTS", seen);
                }
            }
        }
    }
}

fn owner_type_id_for(owner_qname: &str, ctx: &LookupTables) -> Option<String> {
    ctx.type_id_by_qname.get(owner_qname).cloned()
}

fn jpa_repository_entity_names(decl: Node, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    if !matches!(decl.kind(), "class_declaration" | "interface_declaration") {
        return out;
    }
    let mut cursor = decl.walk();
    for child in decl.children(&mut cursor) {
        if !matches!(child.kind(), "extends_interfaces" | "super_interfaces") {
            continue;
        }
        let Some(type_list) = java_ast::find_child_of_kind(child, "type_list") else { continue };
        let mut tcursor = type_list.walk();
        for type_ref in type_list.named_children(&mut tcursor) {
            let full_text = java_ast::text(type_ref, source);
            let base_name = java_ast::raw_type_name(type_ref, source);
            if !JPA_REPOSITORY_BASES.contains(&base_name.as_str()) {
                continue;
            }
            if let Some(caps) = GENERIC_FIRST_ARG_RE.captures(full_text) {
                out.push(caps[1].to_string());
            }
        }
    }
    out
}

fn annotation_texts_of(node: Node, source: &str) -> Vec<String> {
    let mut texts = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            let mut mcursor = child.walk();
            for modifier in child.children(&mut mcursor) {
                if modifier.kind().contains("annotation") {
                    texts.push(java_ast::text(modifier, source).trim().to_string());
                }
            }
        } else if child.kind().contains("annotation") {
            texts.push(java_ast::text(child, source).trim().to_string());
        }
    }
    texts
}

fn annotation_name_from_text(annotation_text: &str) -> Option<String> {
    let caps = ANNOTATION_NAME_RE.captures(annotation_text)?;
    Some(caps[1].rsplit('.').next().unwrap_or(&caps[1]).to_string())
}

fn stereotypes_for_type(annotations: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for ann in annotations {
        if CONTROLLER_ANNOTATIONS.contains(&ann.as_str()) {
            out.push("spring:controller".to_string());
        }
        if COMPONENT_ANNOTATIONS.contains(&ann.as_str()) {
            out.push("spring:component".to_string());
        }
        if ENTITY_ANNOTATIONS.contains(&ann.as_str()) {
            out.push("jpa:entity".to_string());
        }
    }
    out
}

fn extract_request_mapping_prefixes(annotation_texts: &[String]) -> Vec<String> {
    let mut prefixes = Vec::new();
    for text in annotation_texts {
        let Some(name) = annotation_name_from_text(text) else { continue };
        if name != REQUEST_MAPPING {
            continue;
        }
        for path in extract_mapping_paths(text) {
            prefixes.push(normalize_path(&path));
        }
    }
    if prefixes.is_empty() {
        prefixes.push(String::new());
    }
    prefixes
}

fn extract_routes_from_texts(annotation_texts: &[String]) -> Vec<String> {
    let mut routes = Vec::new();
    for text in annotation_texts {
        let Some(name) = annotation_name_from_text(text) else { continue };

        if let Some(method) = route_annotation_method(&name) {
            let paths = extract_mapping_paths(text);
            let paths = if paths.is_empty() { vec!["/".to_string()] } else { paths };
            for path in paths {
                routes.push(format!("{method} {}", normalize_path(&path)));
            }
            continue;
        }

        if name == REQUEST_MAPPING {
            let methods: Vec<String> = REQUEST_METHOD_RE.captures_iter(text).map(|c| c[1].to_string()).collect();
            let methods = if methods.is_empty() { vec!["ANY".to_string()] } else { methods };
            let paths = extract_mapping_paths(text);
            let paths = if paths.is_empty() { vec!["/".to_string()] } else { paths };
            for m in &methods {
                for path in &paths {
                    routes.push(format!("{m} {}", normalize_path(path)));
                }
            }
        }
    }
    routes
}

fn extract_mapping_paths(annotation_text: &str) -> Vec<String> {
    let mut assigned = Vec::new();
    for m in MAPPING_VALUE_OR_PATH_RE.captures_iter(annotation_text) {
        let value = &m[1];
        for lit in STRING_LITERAL_RE.captures_iter(value) {
            assigned.push(lit[1].to_string());
        }
    }
    if !assigned.is_empty() {
        return assigned;
    }

    let Some(start) = annotation_text.find('(') else { return Vec::new() };
    let Some(end) = annotation_text.rfind(')') else { return Vec::new() };
    if end <= start {
        return Vec::new();
    }
    let mut args = &annotation_text[start + 1..end];
    if let Some(key_match) = ARG_KEY_ASSIGN_RE.find(args) {
        args = &args[..key_match.start()];
    }
    STRING_LITERAL_RE.captures_iter(args).map(|c| c[1].to_string()).collect()
}

fn normalize_path(path: &str) -> String {
    let p = path.trim();
    if p.is_empty() {
        "/".to_string()
    } else if p.starts_with('/') {
        p.to_string()
    } else {
        format!("/{p}")
    }
}

fn expand_routes_with_prefixes(prefixes: &[String], routes: &[String]) -> Vec<String> {
    let mut expanded = Vec::new();
    for route in routes {
        let Some((method, path)) = route.split_once(' ') else {
            expanded.push(route.clone());
            continue;
        };
        for prefix in prefixes {
            expanded.push(format!("{method} {}", join_paths(prefix, path)));
        }
    }
    expanded
}

fn join_paths(prefix: &str, path: &str) -> String {
    let p1 = prefix.trim_end_matches('/');
    let p2 = path.trim_start_matches('/');
    if p1.is_empty() {
        return if p2.is_empty() { "/".to_string() } else { format!("/{p2}") };
    }
    if p2.is_empty() {
        return if p1.starts_with('/') { p1.to_string() } else { format!("/{p1}") };
    }
    let p1 = if p1.starts_with('/') { p1.to_string() } else { format!("/{p1}") };
    format!("{p1}/{p2}")
}

fn resolve_type_id(type_name: &str, file: &FileInfo, ctx: &LookupTables) -> Option<String> {
    if type_name.contains('.') {
        if let Some(id) = ctx.type_id_by_qname.get(type_name) {
            return Some(id.clone());
        }
    }

    if !file.package_name.is_empty() {
        let same_pkg = format!("{}.{type_name}", file.package_name);
        if let Some(id) = ctx.type_id_by_qname.get(&same_pkg) {
            return Some(id.clone());
        }
    }

    for imp in &file.explicit_imports {
        if imp.ends_with(&format!(".{type_name}")) {
            if let Some(id) = ctx.type_id_by_qname.get(imp) {
                return Some(id.clone());
            }
        }
    }

    for imp in &file.wildcard_imports {
        let candidate = format!("{imp}.{type_name}");
        if let Some(id) = ctx.type_id_by_qname.get(&candidate) {
            return Some(id.clone());
        }
    }

    let candidates = ctx.type_qnames_by_name.get(type_name)?;
    if candidates.len() == 1 {
        return ctx.type_id_by_qname.get(&candidates[0]).cloned();
    }
    None
}
