//! Shared route-extraction engine for Go HTTP router frameworks (Gin,
//! Fiber). Both frameworks expose the same shape — a method whose first
//! positional string argument is a path, or a verb-then-path pair, plus a
//! `Group` method for prefix nesting — so the walk lives here once and
//! [`crate::gin::GinEnricher`]/[`crate::fiber::FiberEnricher`] each just
//! supply a [`GoRouterConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use tree_sitter::{Node, Parser};
use walkdir::WalkDir;

use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;
use codegraph_lang_go::ast as go_ast;

/// Which Go HTTP framework to look for, and how its routing methods read.
#[derive(Clone, Copy, Debug)]
pub struct GoRouterConfig {
    pub framework: &'static str,
    pub import_prefixes: &'static [&'static str],
    /// Method name -> HTTP verb, for calls shaped `router.Get("/path", handler)`.
    pub path_first_methods: &'static [(&'static str, &'static str)],
    /// Method names shaped `router.Handle("GET", "/path", handler)` — the
    /// verb itself is the first argument.
    pub verb_path_methods: &'static [&'static str],
    pub group_method: &'static str,
}

impl GoRouterConfig {
    fn route_stereotype(&self) -> String {
        format!("{}:route", self.framework)
    }

    fn path_first_verb(&self, field_name: &str) -> Option<&'static str> {
        self.path_first_methods.iter().find(|(k, _)| *k == field_name).map(|(_, v)| *v)
    }
}

pub(crate) fn enrich(config: &GoRouterConfig, ir: &mut IrRoot, source_root: &Path) -> Result<(), AnalysisError> {
    let module_name = go_ast::read_module_name(source_root);

    let callables_by_qname: FxHashMap<String, usize> = ir
        .callables
        .iter()
        .enumerate()
        .filter(|(_, c)| c.language == LanguageTag::Go)
        .map(|(i, c)| (c.qualified_name.clone(), i))
        .collect();

    let mut parser = Parser::new();
    if parser.set_language(&tree_sitter_go::LANGUAGE.into()).is_err() {
        return Ok(());
    }

    for path in collect_go_files(source_root) {
        let Ok(source) = fs::read_to_string(&path) else {
            tracing::warn!(path = %path.display(), "failed to read file, skipping");
            continue;
        };
        let Some(tree) = parser.parse(&source, None) else { continue };
        let root = tree.root_node();

        let package_clause = go_ast::package_clause_name(root, &source);
        if package_clause.is_empty() {
            continue;
        }
        let qualified_pkg = go_ast::qualified_package_name(module_name.as_deref(), source_root, &path, &package_clause);

        let import_aliases: FxHashMap<String, String> = go_ast::imports(root, &source).into_iter().collect();
        let import_paths: FxHashSet<&str> = import_aliases.values().map(String::as_str).collect();
        if !mentions_framework(config, &import_paths) {
            continue;
        }

        let mut group_prefix_by_var: FxHashMap<String, String> = FxHashMap::default();
        walk(config, root, &source, &qualified_pkg, &import_aliases, &mut group_prefix_by_var, &callables_by_qname, ir);
    }

    Ok(())
}

fn collect_go_files(source_root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(source_root)
        .into_iter()
        .filter_entry(|e| {
            e.file_type().is_file()
                || !codegraph_common::limits::SKIPPED_DIRECTORY_NAMES
                    .contains(&e.file_name().to_string_lossy().as_ref())
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "go"))
        .filter(|e| !e.path().file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with("_test.go")))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn mentions_framework(config: &GoRouterConfig, import_paths: &FxHashSet<&str>) -> bool {
    import_paths
        .iter()
        .any(|path| config.import_prefixes.iter().any(|prefix| *path == *prefix || path.starts_with(&format!("{prefix}/"))))
}

#[allow(clippy::too_many_arguments)]
fn walk(
    config: &GoRouterConfig,
    node: Node,
    source: &str,
    qualified_pkg: &str,
    import_aliases: &FxHashMap<String, String>,
    group_prefix_by_var: &mut FxHashMap<String, String>,
    callables_by_qname: &FxHashMap<String, usize>,
    ir: &mut IrRoot,
) {
    match node.kind() {
        "short_var_declaration" | "assignment_statement" => {
            maybe_capture_group_assignment(config, node, source, group_prefix_by_var);
        }
        "call_expression" => {
            maybe_capture_route_call(config, node, source, qualified_pkg, import_aliases, group_prefix_by_var, callables_by_qname, ir);
        }
        _ => {}
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        walk(config, child, source, qualified_pkg, import_aliases, group_prefix_by_var, callables_by_qname, ir);
    }
}

fn maybe_capture_group_assignment(
    config: &GoRouterConfig,
    node: Node,
    source: &str,
    group_prefix_by_var: &mut FxHashMap<String, String>,
) {
    let Some(left) = node.child_by_field_name("left") else { return };
    let Some(right) = node.child_by_field_name("right") else { return };

    let Some(left_ident) = single_identifier(left, source) else { return };
    let Some(call_expr) = single_call(right) else { return };

    if let Some(prefix) = extract_group_prefix_from_call(config, call_expr, source, group_prefix_by_var) {
        group_prefix_by_var.insert(left_ident, prefix);
    }
}

#[allow(clippy::too_many_arguments)]
fn maybe_capture_route_call(
    config: &GoRouterConfig,
    call_node: Node,
    source: &str,
    qualified_pkg: &str,
    import_aliases: &FxHashMap<String, String>,
    group_prefix_by_var: &FxHashMap<String, String>,
    callables_by_qname: &FxHashMap<String, usize>,
    ir: &mut IrRoot,
) {
    let Some((receiver_node, field_name)) = route_method_info(config, call_node, source) else { return };
    let args = call_arguments(call_node);
    if args.is_empty() {
        return;
    }

    let (http_method, path, handler_node) = if let Some(method) = config.path_first_verb(&field_name) {
        if args.len() < 2 {
            return;
        }
        let Some(path) = string_literal_value(args[0], source) else { return };
        (method.to_string(), path, args[args.len() - 1])
    } else if config.verb_path_methods.contains(&field_name.as_str()) {
        if args.len() < 3 {
            return;
        }
        let Some(verb) = string_literal_value(args[0], source) else { return };
        let Some(path) = string_literal_value(args[1], source) else { return };
        (verb.to_uppercase(), path, args[args.len() - 1])
    } else {
        return;
    };

    let receiver_prefix = resolve_receiver_prefix(config, receiver_node, source, group_prefix_by_var);
    let full_path = join_paths(&receiver_prefix, &normalize_path(&path));

    let Some(callable_qname) = resolve_handler_qname(handler_node, source, qualified_pkg, import_aliases) else { return };
    let Some(&idx) = callables_by_qname.get(&callable_qname) else { return };

    let route = format!("{http_method} {full_path}");
    crate::util::merge_unique(&mut ir.callables[idx].routes, [route]);
    crate::util::merge_unique(&mut ir.callables[idx].stereotypes, [config.route_stereotype()]);
}

fn route_method_info<'a>(config: &GoRouterConfig, call_node: Node<'a>, source: &str) -> Option<(Node<'a>, String)> {
    let func_node = call_node.child_by_field_name("function")?;
    if func_node.kind() != "selector_expression" {
        return None;
    }
    let field_node = func_node.child_by_field_name("field")?;
    let operand_node = func_node.child_by_field_name("operand")?;
    let field_name = go_ast::text(field_node, source).to_string();
    if config.path_first_verb(&field_name).is_some() || config.verb_path_methods.contains(&field_name.as_str()) {
        Some((operand_node, field_name))
    } else {
        None
    }
}

fn resolve_receiver_prefix(
    config: &GoRouterConfig,
    receiver_node: Node,
    source: &str,
    group_prefix_by_var: &FxHashMap<String, String>,
) -> String {
    match receiver_node.kind() {
        "identifier" => {
            let name = go_ast::text(receiver_node, source);
            group_prefix_by_var.get(name).cloned().unwrap_or_default()
        }
        "call_expression" => extract_group_prefix_from_call(config, receiver_node, source, group_prefix_by_var).unwrap_or_default(),
        _ => String::new(),
    }
}

fn extract_group_prefix_from_call(
    config: &GoRouterConfig,
    call_node: Node,
    source: &str,
    group_prefix_by_var: &FxHashMap<String, String>,
) -> Option<String> {
    let func_node = call_node.child_by_field_name("function")?;
    if func_node.kind() != "selector_expression" {
        return None;
    }
    let field_node = func_node.child_by_field_name("field")?;
    let operand_node = func_node.child_by_field_name("operand")?;
    let field_name = go_ast::text(field_node, source);
    if field_name != config.group_method {
        return None;
    }

    let args = call_arguments(call_node);
    let segment = string_literal_value(*args.first()?, source)?;

    let parent_prefix = resolve_receiver_prefix(config, operand_node, source, group_prefix_by_var);
    Some(join_paths(&parent_prefix, &normalize_path(&segment)))
}

fn resolve_handler_qname(handler_node: Node, source: &str, qualified_pkg: &str, import_aliases: &FxHashMap<String, String>) -> Option<String> {
    match handler_node.kind() {
        "identifier" => {
            let name = go_ast::text(handler_node, source);
            Some(format!("{qualified_pkg}.{name}"))
        }
        "selector_expression" => {
            let operand_node = handler_node.child_by_field_name("operand")?;
            let field_node = handler_node.child_by_field_name("field")?;
            if operand_node.kind() != "identifier" {
                return None;
            }
            let pkg_alias = go_ast::text(operand_node, source);
            let import_path = import_aliases.get(pkg_alias)?;
            let name = go_ast::text(field_node, source);
            Some(format!("{import_path}.{name}"))
        }
        _ => None,
    }
}

fn call_arguments(call_node: Node) -> Vec<Node<'_>> {
    let Some(args_node) = call_node.child_by_field_name("arguments") else { return Vec::new() };
    let mut cursor = args_node.walk();
    args_node.named_children(&mut cursor).collect()
}

fn string_literal_value(node: Node, source: &str) -> Option<String> {
    if !matches!(node.kind(), "interpreted_string_literal" | "raw_string_literal") {
        return None;
    }
    let raw = go_ast::text(node, source);
    if raw.starts_with('`') && raw.ends_with('`') && raw.len() >= 2 {
        return Some(raw[1..raw.len() - 1].to_string());
    }
    if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
        return Some(unescape_go_string(&raw[1..raw.len() - 1]));
    }
    None
}

fn unescape_go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn single_identifier(expr_list: Node, source: &str) -> Option<String> {
    if expr_list.kind() != "expression_list" {
        return None;
    }
    let mut cursor = expr_list.walk();
    let idents: Vec<String> =
        expr_list.named_children(&mut cursor).filter(|c| c.kind() == "identifier").map(|c| go_ast::text(c, source).to_string()).collect();
    if idents.len() == 1 {
        idents.into_iter().next()
    } else {
        None
    }
}

fn single_call(expr_list: Node) -> Option<Node<'_>> {
    if expr_list.kind() != "expression_list" {
        return None;
    }
    let mut cursor = expr_list.walk();
    let calls: Vec<Node> = expr_list.named_children(&mut cursor).filter(|c| c.kind() == "call_expression").collect();
    if calls.len() == 1 {
        calls.into_iter().next()
    } else {
        None
    }
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
