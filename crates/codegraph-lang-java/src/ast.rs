//! Shared tree-sitter-java AST extraction helpers used by both the scanner
//! and the resolver: text slicing, type-name canonicalization, signature
//! building, modifiers, annotations, and package/import extraction.

use tree_sitter::Node;

#[must_use]
pub fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// The `package` declaration's dotted name, or empty for the default package.
#[must_use]
pub fn package_name(root: Node, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            if let Some(name_node) = child.named_child(0) {
                return text(name_node, source).to_string();
            }
        }
    }
    String::new()
}

/// Explicit single-type imports and wildcard-import prefixes, in source
/// order.
#[must_use]
pub fn imports(root: Node, source: &str) -> (Vec<String>, Vec<String>) {
    let mut explicit = Vec::new();
    let mut wildcard = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let raw = text(child, source);
        let raw = raw
            .trim_start_matches("import")
            .trim_start_matches("static")
            .trim_end_matches(';')
            .trim();
        if let Some(prefix) = raw.strip_suffix(".*") {
            wildcard.push(prefix.trim().to_string());
        } else if !raw.is_empty() {
            explicit.push(raw.to_string());
        }
    }
    (explicit, wildcard)
}

/// Strips generics down to the raw type name and recurses through array
/// dimensions, e.g. `List<String>` -> `List`, `int[]` -> `int[]`.
#[must_use]
pub fn raw_type_name(node: Node, source: &str) -> String {
    match node.kind() {
        "generic_type" => node
            .named_child(0)
            .map(|base| raw_type_name(base, source))
            .unwrap_or_else(|| text(node, source).to_string()),
        "array_type" => {
            let element = node
                .child_by_field_name("element")
                .map(|e| raw_type_name(e, source))
                .unwrap_or_default();
            format!("{element}[]")
        }
        "scoped_type_identifier" => {
            // Keep only the final segment for a stable short qualified form.
            text(node, source)
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_string()
        }
        _ => text(node, source).to_string(),
    }
}

/// The canonical parameter-type-list signature for a method/constructor
/// declaration's `formal_parameters` child: `(T1, T2)`, `()`.
#[must_use]
pub fn canonical_signature(formal_parameters: Node, source: &str) -> String {
    let mut parts = Vec::new();
    let mut cursor = formal_parameters.walk();
    for param in formal_parameters.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => {
                if let Some(type_node) = param.child_by_field_name("type") {
                    parts.push(raw_type_name(type_node, source));
                }
            }
            "spread_parameter" => {
                if let Some(type_node) = param.child_by_field_name("type") {
                    parts.push(format!("{}...", raw_type_name(type_node, source)));
                }
            }
            _ => {}
        }
    }
    format!("({})", parts.join(", "))
}

/// Parameter name -> declared type, in declaration order (receiver-equivalent
/// bindings for the local scope).
#[must_use]
pub fn parameter_bindings(formal_parameters: Node, source: &str) -> Vec<(String, String)> {
    let mut bindings = Vec::new();
    let mut cursor = formal_parameters.walk();
    for param in formal_parameters.named_children(&mut cursor) {
        let (name_node, type_node, is_vararg) = match param.kind() {
            "formal_parameter" => (
                param.child_by_field_name("name"),
                param.child_by_field_name("type"),
                false,
            ),
            "spread_parameter" => (
                param.child_by_field_name("name"),
                param.child_by_field_name("type"),
                true,
            ),
            _ => continue,
        };
        if let (Some(name_node), Some(type_node)) = (name_node, type_node) {
            let type_name = raw_type_name(type_node, source);
            let type_name = if is_vararg {
                format!("{type_name}[]")
            } else {
                type_name
            };
            bindings.push((text(name_node, source).to_string(), type_name));
        }
    }
    bindings
}

/// Raw modifier keyword tokens (`public`, `static`, `final`, ...), excluding
/// annotations.
#[must_use]
pub fn modifiers(declaration: Node, source: &str) -> Vec<String> {
    let Some(mods_node) = find_child_of_kind(declaration, "modifiers") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = mods_node.walk();
    for child in mods_node.children(&mut cursor) {
        if !child.kind().contains("annotation") {
            out.push(text(child, source).to_string());
        }
    }
    out
}

/// Raw annotation names (without `@` or arguments), best-effort.
#[must_use]
pub fn annotations(declaration: Node, source: &str) -> Vec<String> {
    let Some(mods_node) = find_child_of_kind(declaration, "modifiers") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = mods_node.walk();
    for child in mods_node.children(&mut cursor) {
        if child.kind() == "annotation" || child.kind() == "marker_annotation" {
            if let Some(name_node) = child.child_by_field_name("name") {
                out.push(text(name_node, source).to_string());
            }
        }
    }
    out
}

/// The first direct child of `node` with kind `kind`.
#[must_use]
pub fn find_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).find(|c| c.kind() == kind);
    result
}

/// `extends`/`implements` supertype names as written (short or
/// scoped-short), in source order. Constructors for class/interface bodies.
#[must_use]
pub fn supertype_names(declaration: Node, source: &str) -> (Vec<String>, Vec<String>) {
    let mut extends = Vec::new();
    let mut implements = Vec::new();

    if let Some(superclass) = find_child_of_kind(declaration, "superclass") {
        if let Some(type_node) = superclass.named_child(0) {
            extends.push(raw_type_name(type_node, source));
        }
    }
    if let Some(super_interfaces) = find_child_of_kind(declaration, "super_interfaces") {
        if let Some(type_list) = find_child_of_kind(super_interfaces, "type_list") {
            let mut cursor = type_list.walk();
            for t in type_list.named_children(&mut cursor) {
                implements.push(raw_type_name(t, source));
            }
        }
    }
    // interface_declaration uses `extends_interfaces` for multi-extends.
    if let Some(extends_interfaces) = find_child_of_kind(declaration, "extends_interfaces") {
        if let Some(type_list) = find_child_of_kind(extends_interfaces, "type_list") {
            let mut cursor = type_list.walk();
            for t in type_list.named_children(&mut cursor) {
                extends.push(raw_type_name(t, source));
            }
        }
    }

    (extends, implements)
}
