use codegraph_symbols::{FileContext, LocalScope, SymbolTable};
use tree_sitter::Parser;

use crate::context::ExprContext;
use crate::java::infer_type;

fn parse_expression(source: &str) -> (tree_sitter::Tree, String) {
    let wrapped = format!("class T {{ void m() {{ Object x = {source}; }} }}");
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .expect("java grammar");
    let tree = parser.parse(&wrapped, None).expect("parse");
    (tree, wrapped)
}

fn find_value_node(tree: &tree_sitter::Tree) -> tree_sitter::Node<'_> {
    // local_variable_declaration -> variable_declarator -> value (field "value")
    let root = tree.root_node();
    let mut cursor = root.walk();
    fn walk<'a>(node: tree_sitter::Node<'a>, cursor: &mut tree_sitter::TreeCursor<'a>) -> Option<tree_sitter::Node<'a>> {
        if node.kind() == "variable_declarator" {
            if let Some(value) = node.child_by_field_name("value") {
                return Some(value);
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
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("String".to_string()));
}

#[test]
fn integer_literal_with_long_suffix() {
    let (tree, source) = parse_expression("42L");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("long".to_string()));
}

#[test]
fn method_invocation_prefers_symbol_table_over_heuristic() {
    let (tree, source) = parse_expression("service.compute()");
    let node = find_value_node(&tree);
    let mut symbols = SymbolTable::new();
    symbols.register_callable("compute", "Service.compute", "()", Some("Result"));
    let mut scope = LocalScope::new();
    scope.bind("service", "Service");
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("Result".to_string()));
}

#[test]
fn method_invocation_falls_back_to_heuristic_table() {
    let (tree, source) = parse_expression("name.toString()");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let mut scope = LocalScope::new();
    scope.bind("name", "Object");
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("String".to_string()));
}

#[test]
fn binary_string_concat_wins_over_numeric_promotion() {
    let (tree, source) = parse_expression("\"count: \" + 1");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("String".to_string()));
}

#[test]
fn comparison_operator_infers_boolean() {
    let (tree, source) = parse_expression("1 < 2");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("boolean".to_string()));
}

#[test]
fn numeric_promotion_widens_to_double() {
    let (tree, source) = parse_expression("1 + 2.0");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("double".to_string()));
}

#[test]
fn this_is_a_miss_by_design() {
    let (tree, source) = parse_expression("this");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), None);
}

#[test]
fn object_creation_strips_generics() {
    let (tree, source) = parse_expression("new ArrayList<String>()");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let scope = LocalScope::new();
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("ArrayList".to_string()));
}

#[test]
fn field_access_uses_symbol_table_field_type() {
    let (tree, source) = parse_expression("user.name");
    let node = find_value_node(&tree);
    let mut symbols = SymbolTable::new();
    symbols.register_field("User", "name", "String");
    let mut scope = LocalScope::new();
    scope.bind("user", "User");
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("String".to_string()));
}

#[test]
fn ternary_with_null_branch_prefers_other_side() {
    let (tree, source) = parse_expression("flag ? null : \"x\"");
    let node = find_value_node(&tree);
    let symbols = SymbolTable::new();
    let mut scope = LocalScope::new();
    scope.bind("flag", "boolean");
    let file = FileContext::new("");
    let ctx = ExprContext::new(&symbols, &scope, &file, &source);
    assert_eq!(infer_type(node, &ctx), Some("String".to_string()));
}
