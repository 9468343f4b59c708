//! Shared tree-sitter-go AST extraction helpers used by both the scanner and
//! the resolver: text slicing, package/module derivation, type-name
//! canonicalization, signature building, embedding detection.

use std::fs;
use std::path::Path;

use tree_sitter::Node;

#[must_use]
pub fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// The `package` clause's bare identifier, e.g. `main`.
#[must_use]
pub fn package_clause_name(root: Node, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_clause" {
            if let Some(ident) = child.named_child(0) {
                return text(ident, source).to_string();
            }
        }
    }
    String::new()
}

/// Reads `<source_root>/go.mod` and returns the module path declared on its
/// first `module <name>` line, if present.
#[must_use]
pub fn read_module_name(source_root: &Path) -> Option<String> {
    let contents = fs::read_to_string(source_root.join("go.mod")).ok()?;
    for line in contents.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("module ") {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Derives the qualified package name for a file as `<module>/<relative-dir>`,
/// falling back to the bare relative directory (or the package clause name at
/// the source root) when no `go.mod` is present.
#[must_use]
pub fn qualified_package_name(
    module_name: Option<&str>,
    source_root: &Path,
    file_path: &Path,
    package_clause: &str,
) -> String {
    let rel_dir = file_path
        .parent()
        .and_then(|p| p.strip_prefix(source_root).ok())
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    match module_name {
        Some(module) if rel_dir.is_empty() => module.to_string(),
        Some(module) => format!("{module}/{rel_dir}"),
        None if rel_dir.is_empty() => package_clause.to_string(),
        None => rel_dir,
    }
}

/// Import alias (explicit name, or the last path segment when unaliased) ->
/// import path, in source order. Dot-imports and blank imports are skipped:
/// neither introduces a resolvable alias for our simplified cross-package
/// type qualification.
#[must_use]
pub fn imports(root: Node, source: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        collect_import_specs(child, source, &mut out);
    }
    out
}

fn collect_import_specs(node: Node, source: &str, out: &mut Vec<(String, String)>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let Some(path_node) = child.child_by_field_name("path") else {
                    continue;
                };
                let path = text(path_node, source).trim_matches('"').to_string();
                let alias = match child.child_by_field_name("name") {
                    Some(name_node) => {
                        let alias_text = text(name_node, source);
                        if alias_text == "." || alias_text == "_" {
                            continue;
                        }
                        alias_text.to_string()
                    }
                    None => path.rsplit('/').next().unwrap_or(&path).to_string(),
                };
                out.push((alias, path));
            }
            "import_spec_list" => collect_import_specs(child, source, out),
            _ => {}
        }
    }
}

/// Strips a leading pointer marker, generic type arguments, and resolves a
/// qualified type (`pkg.Foo`) down to its bare final segment, recursing
/// through pointer/slice/array/map wrappers to find the base identifier used
/// for embedding/hierarchy resolution.
#[must_use]
pub fn raw_type_name(node: Node, source: &str) -> String {
    match node.kind() {
        "pointer_type" => node
            .named_child(0)
            .map(|inner| format!("*{}", raw_type_name(inner, source)))
            .unwrap_or_else(|| text(node, source).to_string()),
        "generic_type" => node
            .child_by_field_name("type")
            .map(|inner| raw_type_name(inner, source))
            .unwrap_or_else(|| text(node, source).to_string()),
        "qualified_type" => child_text_by_field(node, "name", source)
            .unwrap_or_else(|| text(node, source).to_string()),
        "slice_type" => node
            .child_by_field_name("element")
            .map(|e| format!("[]{}", raw_type_name(e, source)))
            .unwrap_or_else(|| text(node, source).to_string()),
        "array_type" => node
            .child_by_field_name("element")
            .map(|e| format!("[{}]{}", array_length_text(node, source), raw_type_name(e, source)))
            .unwrap_or_else(|| text(node, source).to_string()),
        "map_type" => {
            let key = node.child_by_field_name("key").map(|k| raw_type_name(k, source));
            let value = node.child_by_field_name("value").map(|v| raw_type_name(v, source));
            match (key, value) {
                (Some(k), Some(v)) => format!("map[{k}]{v}"),
                _ => text(node, source).to_string(),
            }
        }
        _ => text(node, source).to_string(),
    }
}

fn array_length_text(node: Node, source: &str) -> String {
    node.child_by_field_name("length")
        .map(|n| text(n, source).to_string())
        .unwrap_or_default()
}

fn child_text_by_field<'a>(node: Node<'a>, field: &str, source: &'a str) -> Option<String> {
    node.child_by_field_name(field).map(|n| text(n, source).to_string())
}

/// Strips a single leading pointer marker from a written type string, e.g.
/// `*User` -> `User`. Used both for the signature-level conflation of value
/// and pointer parameter types (a deliberate, documented limitation — see the
/// adapter module docs) and for resolving a pointer-typed receiver/embedded
/// field against the symbol table, which always keys struct types by their
/// bare name.
#[must_use]
pub fn strip_pointer_prefix(raw_type: &str) -> String {
    raw_type.strip_prefix('*').unwrap_or(raw_type).to_string()
}

/// The canonical `(T1, T2)` signature for a `parameter_list` node, excluding
/// any receiver. Grouped parameter names (`a, b int`) expand to one entry per
/// name; anonymous parameters (interface method signatures) contribute one
/// entry each.
#[must_use]
pub fn canonical_signature(parameters: Node, source: &str) -> String {
    let mut parts = Vec::new();
    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        match param.kind() {
            "parameter_declaration" => {
                let Some(type_node) = param.child_by_field_name("type") else {
                    continue;
                };
                let type_name = strip_pointer_prefix(&raw_type_name(type_node, source));
                let mut name_cursor = param.walk();
                let name_count = param
                    .children_by_field_name("name", &mut name_cursor)
                    .count()
                    .max(1);
                for _ in 0..name_count {
                    parts.push(type_name.clone());
                }
            }
            "variadic_parameter_declaration" => {
                if let Some(type_node) = param.child_by_field_name("type") {
                    let type_name = strip_pointer_prefix(&raw_type_name(type_node, source));
                    parts.push(format!("{type_name}..."));
                }
            }
            _ => {}
        }
    }
    format!("({})", parts.join(", "))
}

/// Parameter name -> declared type (pointer marker preserved), in declaration
/// order, for local-scope binding at function/method entry.
#[must_use]
pub fn parameter_bindings(parameters: Node, source: &str) -> Vec<(String, String)> {
    let mut bindings = Vec::new();
    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        let (is_variadic, type_node) = match param.kind() {
            "parameter_declaration" => (false, param.child_by_field_name("type")),
            "variadic_parameter_declaration" => (true, param.child_by_field_name("type")),
            _ => continue,
        };
        let Some(type_node) = type_node else { continue };
        let mut type_name = raw_type_name(type_node, source);
        if is_variadic {
            type_name = format!("[]{type_name}");
        }
        let mut name_cursor = param.walk();
        for name_node in param.children_by_field_name("name", &mut name_cursor) {
            bindings.push((text(name_node, source).to_string(), type_name.clone()));
        }
    }
    bindings
}

/// The receiver's variable name and struct type name (pointer marker
/// preserved on the type, stripped by the caller where an owner key is
/// needed), or `None` for a plain function declaration.
#[must_use]
pub fn receiver_binding(method_decl: Node, source: &str) -> Option<(Option<String>, String)> {
    let receiver_list = method_decl.child_by_field_name("receiver")?;
    let mut cursor = receiver_list.walk();
    let param = receiver_list
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let type_node = param.child_by_field_name("type")?;
    let type_name = raw_type_name(type_node, source);
    let name = param
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string());
    Some((name, type_name))
}

/// The single result type as written, or `None` for no result / multiple
/// named results (not representable as a single return-type field).
#[must_use]
pub fn result_type(decl: Node, source: &str) -> Option<String> {
    let result = decl.child_by_field_name("result")?;
    if result.kind() == "parameter_list" {
        let mut cursor = result.walk();
        let mut types: Vec<Node> = result.named_children(&mut cursor).collect();
        if types.len() == 1 {
            return types.pop().and_then(|t| t.child_by_field_name("type")).map(|t| raw_type_name(t, source));
        }
        return None;
    }
    Some(raw_type_name(result, source))
}

/// Struct fields with no `name` child are embedded (anonymous) fields —
/// returns their written type names in source order.
#[must_use]
pub fn embedded_field_names(struct_type: Node, source: &str) -> Vec<String> {
    let Some(field_list) = find_child_of_kind(struct_type, "field_declaration_list") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = field_list.walk();
    for field in field_list.named_children(&mut cursor) {
        if field.kind() != "field_declaration" {
            continue;
        }
        if field.child_by_field_name("name").is_some() {
            continue;
        }
        if let Some(type_node) = field.child_by_field_name("type") {
            out.push(raw_type_name(type_node, source));
        }
    }
    out
}

/// Non-embedded field name -> declared type.
#[must_use]
pub fn named_fields(struct_type: Node, source: &str) -> Vec<(String, String)> {
    let Some(field_list) = find_child_of_kind(struct_type, "field_declaration_list") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = field_list.walk();
    for field in field_list.named_children(&mut cursor) {
        if field.kind() != "field_declaration" {
            continue;
        }
        let Some(type_node) = field.child_by_field_name("type") else {
            continue;
        };
        let type_name = raw_type_name(type_node, source);
        let mut name_cursor = field.walk();
        for name_node in field.children_by_field_name("name", &mut name_cursor) {
            out.push((text(name_node, source).to_string(), type_name.clone()));
        }
    }
    out
}

/// `type_elem` children of an `interface_type` whose first child is a bare
/// type identifier or qualified type — an embedded interface (as opposed to
/// a union type-set term or a method signature, which a `method_elem` covers
/// separately).
#[must_use]
pub fn embedded_interface_names(interface_type: Node, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = interface_type.walk();
    for child in interface_type.named_children(&mut cursor) {
        if child.kind() != "type_elem" {
            continue;
        }
        if let Some(first) = child.named_child(0) {
            if first.kind() == "type_identifier" || first.kind() == "qualified_type" {
                out.push(raw_type_name(first, source));
            }
        }
    }
    out
}

#[must_use]
pub fn find_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).find(|c| c.kind() == kind);
    result
}

/// Top-level declaration is exported (public) iff its identifier starts with
/// an uppercase letter — Go's visibility convention, no explicit modifiers.
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
