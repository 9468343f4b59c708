use codegraph_symbols::{FileContext, LocalScope, SymbolTable};
use tree_sitter::Parser;

use crate::context::ExprContext;
use crate::go::infer_type;

fn parse_expression(source: &str) -> (tree_sitter::Tree, String) {
    let wrapped = format!("package main\nfunc m() {{ x := {source} }}");
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .expect("go grammar");
    let tree = parser.parse(&wrapped, None).expect("parse");
    (tree, wrapped)
}

fn find_value_node(tree: &tree_sitter::Tree) -> tree_sitter::Node<'_> {
    // short_var_declaration -> right (field "right")
    let root = tree.root_node();
    let mut cursor = root.walk();
    fn walk<'a>(node: tree_sitter::Node<'a>, cursor: &mut tree_sitter::TreeCursor<'a>) -> Option<tree_sitter::Node<'a>> {
        if node.kind() == "short_var_declaration" {
            if let Some(right) = node.child_by_field_name("right") {
                return Some(right.named_child(0).unwrap_or(right));
            }
        }
        let children: Vec<tree_sitter::Node<'a>> = node.children(cursor).collect();
        for child in children {
            if let Some(found) = walk(child, cursor) {
                return Some(found);
            }
        }
        None
    }
    walk(root, &mut cursor).expect("value node")
}

#[test]
fn string_literal_infers_string() {
    let (tree, source) = parse_expression("\"hello\"");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("string".to_string()));
}

#[test]
fn nil_literal_is_a_miss() {
    let (tree, source) = parse_expression("nil");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), None);
}

#[test]
fn selector_call_resolves_via_symbol_table() {
    let (tree, source) = parse_expression("client.Fetch()");
    let node = find_value_node(&tree);
    let mut symbols = SymbolTable::new();
    symbols.register_callable("Fetch", "Client.Fetch", "()", Some("Response"));
    let mut scope = LocalScope::new();
    scope.bind("client", "Client");
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("Response".to_string()));
}

#[test]
fn chained_call_with_unknown_inner_return_is_a_miss_not_a_fallback() {
    // external.Get() is unregistered, so its return type is unknown; the
    // outer Process() call must not fall back to "any Process in scope".
    let (tree, source) = parse_expression("external.Get().Process()");
    let node = find_value_node(&tree);
    let mut symbols = SymbolTable::new();
    symbols.register_callable("Process", "Other.Process", "()", Some("int"));
    let scope = LocalScope::new();
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), None);
}

#[test]
fn chained_call_with_known_inner_return_resolves_outer() {
    let (tree, source) = parse_expression("external.Get().Process()");
    let node = find_value_node(&tree);
    let mut symbols = SymbolTable::new();
    symbols.register_callable("Get", "external.Get", "()", Some("Session"));
    symbols.register_callable("Process", "Session.Process", "()", Some("int"));
    let scope = LocalScope::new();
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("int".to_string()));
}

#[test]
fn address_of_wraps_in_pointer_type() {
    let (tree, source) = parse_expression("&obj");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let mut scope = LocalScope::new();
    scope.bind("obj", "User");
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("*User".to_string()));
}

#[test]
fn dereference_strips_pointer_type() {
    let (tree, source) = parse_expression("*ptr");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let mut scope = LocalScope::new();
    scope.bind("ptr", "*User");
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("User".to_string()));
}

#[test]
fn index_expression_on_slice_yields_element_type() {
    let (tree, source) = parse_expression("items[0]");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let mut scope = LocalScope::new();
    scope.bind("items", "[]string");
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("string".to_string()));
}

#[test]
fn index_expression_on_map_yields_value_type() {
    let (tree, source) = parse_expression("counts[\"a\"]");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let mut scope = LocalScope::new();
    scope.bind("counts", "map[string]int");
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("int".to_string()));
}

#[test]
fn composite_literal_infers_declared_type() {
    let (tree, source) = parse_expression("User{}");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("main");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("User".to_string()));
}
