//! Shared tree-sitter-php AST extraction helpers used by both the scanner
//! and the resolver: text slicing, namespace/use extraction, modifiers,
//! signature building, and `extends`/`implements` clause extraction.

use tree_sitter::Node;

pub(crate) const TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "trait_declaration",
];

#[must_use]
pub fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// The `namespace` declaration's dotted name (backslashes normalized to
/// dots), or empty for the global namespace.
#[must_use]
pub fn namespace_name(root: Node, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "namespace_definition" {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name") else {
            return String::new();
        };
        return text(name_node, source).replace('\\', ".");
    }
    String::new()
}

/// `use` aliases as short-name -> fully qualified (dot-separated) name, plus
/// the set of qualified names in source order (for the `FileContext`'s
/// `imports` list).
#[must_use]
pub fn use_map(root: Node, source: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "namespace_use_declaration" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for clause in child.named_children(&mut clause_cursor) {
            if clause.kind() != "namespace_use_clause" {
                continue;
            }
            let Some(qualified_node) = ast_find_qualified_name(clause) else {
                continue;
            };
            let qualified = text(qualified_node, source).replace('\\', ".");
            let mut alias_cursor = clause.walk();
            let alias = clause
                .named_children(&mut alias_cursor)
                .find(|c| c.kind() == "name")
                .map(|n| text(n, source).to_string())
                .unwrap_or_else(|| qualified.rsplit('.').next().unwrap_or(&qualified).to_string());
            out.push((alias, qualified));
        }
    }
    out
}

fn ast_find_qualified_name(clause: Node) -> Option<Node<'_>> {
    let mut cursor = clause.walk();
    let result = clause
        .named_children(&mut cursor)
        .find(|c| c.kind() == "qualified_name" || c.kind() == "name");
    result
}

/// Raw modifier keyword tokens (`public`, `private`, `protected`, `static`,
/// `abstract`, `final`) attached to a class/method declaration.
#[must_use]
pub fn modifiers(declaration: Node, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = declaration.walk();
    for child in declaration.children(&mut cursor) {
        match child.kind() {
            "visibility_modifier" => out.push(text(child, source).to_string()),
            "static_modifier" | "abstract_modifier" | "final_modifier" => {
                out.push(child.kind().trim_end_matches("_modifier").to_string());
            }
            _ => {}
        }
    }
    out
}

/// The canonical `(T1, T2)` signature for a `formal_parameters` node.
/// Untyped parameters contribute `?` (placeholder), matching the resolver's
/// general convention for "type unavailable" rather than guessing.
#[must_use]
pub fn canonical_signature(parameters: Node, source: &str) -> String {
    let mut parts = Vec::new();
    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        match param.kind() {
            "simple_parameter" | "property_promotion_parameter" => {
                parts.push(param_type_text(param, source));
            }
            "variadic_parameter" => {
                let ty = param_type_text(param, source);
                parts.push(if ty == "?" { "?...".to_string() } else { format!("{ty}...") });
            }
            _ => {}
        }
    }
    format!("({})", parts.join(", "))
}

fn param_type_text(param: Node, source: &str) -> String {
    let Some(type_node) = param.child_by_field_name("type") else {
        return "?".to_string();
    };
    let raw = text(type_node, source).replace('\\', ".");
    let raw = raw.trim_start_matches('?');
    if raw.is_empty() {
        "?".to_string()
    } else {
        raw.to_string()
    }
}

/// `extends`/`implements` supertype names as written (backslashes
/// normalized to dots), in source order. A class's `base_clause` is a
/// single name; an interface's `base_clause` may list several (multi-extends
/// is legal for interfaces); `class_interface_clause` is always
/// `implements`.
#[must_use]
pub fn supertype_names(declaration: Node, source: &str) -> (Vec<String>, Vec<String>) {
    let mut extends = Vec::new();
    let mut implements = Vec::new();
    let mut cursor = declaration.walk();
    for child in declaration.named_children(&mut cursor) {
        match child.kind() {
            "base_clause" => {
                let mut name_cursor = child.walk();
                for name_node in child.named_children(&mut name_cursor) {
                    if name_node.kind() == "name" || name_node.kind() == "qualified_name" {
                        extends.push(text(name_node, source).replace('\\', "."));
                    }
                }
            }
            "class_interface_clause" => {
                let mut name_cursor = child.walk();
                for name_node in child.named_children(&mut name_cursor) {
                    if name_node.kind() == "name" || name_node.kind() == "qualified_name" {
                        implements.push(text(name_node, source).replace('\\', "."));
                    }
                }
            }
            _ => {}
        }
    }
    (extends, implements)
}
