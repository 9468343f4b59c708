//! Go expression type inference.
//!
//! Go selector chains can recurse arbitrarily (`a.B().C().D()...`), so unlike
//! the Java inferrer this one carries an explicit cycle guard keyed on
//! tree-sitter node id. Hitting it is a bug, not a legitimate miss, so it
//! still returns `None` rather than panicking — a denial-of-service on
//! malformed input should degrade, not crash the scan.

use rustc_hash::FxHashSet;
use tree_sitter::Node;

use crate::context::ExprContext;
use codegraph_common::limits::MAX_CHAINED_CALL_DEPTH;

/// Infers the type of `node`. Returns `None` on a miss.
#[must_use]
pub fn infer_type<'a>(node: Node, ctx: &ExprContext<'a>) -> Option<String> {
    let mut visited = FxHashSet::default();
    infer_type_guarded(node, ctx, &mut visited, 0)
}

fn infer_type_guarded<'a>(
    node: Node,
    ctx: &ExprContext<'a>,
    visited: &mut FxHashSet<usize>,
    depth: usize,
) -> Option<String> {
    if depth > MAX_CHAINED_CALL_DEPTH {
        return None;
    }
    if !visited.insert(node.id()) {
        return None;
    }

    match node.kind() {
        "int_literal" => Some("int".to_string()),
        "float_literal" => Some("float64".to_string()),
        "interpreted_string_literal" | "raw_string_literal" => Some("string".to_string()),
        "true" | "false" => Some("bool".to_string()),
        "nil" => None,

        "identifier" => ctx.scope.type_of(ctx.text(node)).map(str::to_string),

        "composite_literal" => {
            let type_node = node.child_by_field_name("type")?;
            Some(qualify(ctx.text(type_node), ctx))
        }

        "call_expression" => infer_call_expression(node, ctx, visited, depth),

        "selector_expression" => infer_selector_expression(node, ctx, visited, depth),

        "type_assertion_expression" => {
            let type_node = node.child_by_field_name("type")?;
            Some(ctx.text(type_node).to_string())
        }

        "unary_expression" => infer_unary_expression(node, ctx, visited, depth),

        "parenthesized_expression" => {
            let inner = first_named_child(node)?;
            infer_type_guarded(inner, ctx, visited, depth + 1)
        }

        "index_expression" => {
            let operand = node.child_by_field_name("operand")?;
            let container_type = infer_type_guarded(operand, ctx, visited, depth + 1)?;
            array_element_type(&container_type)
                .or_else(|| map_value_type(&container_type))
                .map(str::to_string)
        }

        "slice_expression" => {
            let operand = node.child_by_field_name("operand")?;
            infer_type_guarded(operand, ctx, visited, depth + 1)
        }

        _ => None,
    }
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let result = node.named_children(&mut cursor).next();
    result
}

/// Resolves a bare composite-literal type name against the symbol table's
/// same-package/single-candidate view, matching the scanner's qualification
/// of declared types. A qualified literal (`pkg.Foo`) is already written in
/// its final form and passed through unchanged. Falls back to the raw name
/// on a miss — unlike the scanner's registration-time fallback, a miss here
/// means the type genuinely isn't one the scan saw, so guessing same-package
/// would be wrong.
fn qualify(raw: &str, ctx: &ExprContext) -> String {
    if raw.contains('.') {
        return raw.to_string();
    }
    ctx.symbols.resolve_type(raw, ctx.file).unwrap_or_else(|| raw.to_string())
}

fn infer_call_expression<'a>(
    node: Node,
    ctx: &ExprContext<'a>,
    visited: &mut FxHashSet<usize>,
    depth: usize,
) -> Option<String> {
    let function = node.child_by_field_name("function")?;

    if function.kind() != "selector_expression" {
        // Bare function call: look up by short name directly.
        let name = ctx.text(function);
        return ctx
            .symbols
            .overloads_of(name)
            .iter()
            .find_map(|sig| ctx.symbols.return_type_of(name, sig))
            .map(str::to_string);
    }

    let operand = function.child_by_field_name("operand")?;
    let field = function.child_by_field_name("field")?;
    let method_name = ctx.text(field);

    let operand_is_call = operand.kind() == "call_expression";
    let receiver_type = infer_type_guarded(operand, ctx, visited, depth + 1);

    if operand_is_call && receiver_type.is_none() {
        // Chained call with an unresolvable inner return type: no fallback.
        return None;
    }

    if let Some(receiver_type) = &receiver_type {
        let owner = receiver_type.trim_start_matches('*');
        for signature in ctx.symbols.overloads_of(&format!("{owner}.{method_name}")) {
            if let Some(rt) = ctx
                .symbols
                .return_type_of(&format!("{owner}.{method_name}"), signature)
            {
                return Some(rt.to_string());
            }
        }
        return None;
    }

    if operand_is_call {
        return None;
    }

    // No receiver type and the operand is not itself a call: fall back to
    // "any callable of that name".
    ctx.symbols
        .overloads_of(method_name)
        .iter()
        .find_map(|sig| ctx.symbols.return_type_of(method_name, sig))
        .map(str::to_string)
}

fn infer_selector_expression<'a>(
    node: Node,
    ctx: &ExprContext<'a>,
    visited: &mut FxHashSet<usize>,
    depth: usize,
) -> Option<String> {
    let operand = node.child_by_field_name("operand")?;
    let field = node.child_by_field_name("field")?;
    let field_name = ctx.text(field);

    let operand_type = infer_type_guarded(operand, ctx, visited, depth + 1)?;
    let owner = operand_type.trim_start_matches('*');
    ctx.symbols.field_type(owner, field_name).map(str::to_string)
}

fn infer_unary_expression<'a>(
    node: Node,
    ctx: &ExprContext<'a>,
    visited: &mut FxHashSet<usize>,
    depth: usize,
) -> Option<String> {
    let operator = node.child_by_field_name("operator").map(|n| ctx.text(n))?;
    let operand = node.child_by_field_name("operand")?;
    let operand_type = infer_type_guarded(operand, ctx, visited, depth + 1)?;

    match operator {
        "&" => Some(format!("*{operand_type}")),
        "*" => operand_type.strip_prefix('*').map(str::to_string),
        _ => Some(operand_type),
    }
}

/// Parses a `[]E` type string, returning `E`. Bracket-balanced so `[][]int`
/// yields `[]int`, not a truncated `int`.
fn array_element_type(type_str: &str) -> Option<&str> {
    type_str.strip_prefix("[]")
}

/// Parses a `map[K]V` type string, returning `V`. The key is bracket-balanced
/// scanned so a composite key type like `map[[2]int]string` resolves to
/// `string` rather than stopping at the first `]`.
fn map_value_type(type_str: &str) -> Option<&str> {
    let rest = type_str.strip_prefix("map[")?;
    let mut depth = 1usize;
    for (i, ch) in rest.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[i + 1..]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_element_type_strips_one_level() {
        assert_eq!(array_element_type("[]int"), Some("int"));
        assert_eq!(array_element_type("[][]int"), Some("[]int"));
        assert_eq!(array_element_type("int"), None);
    }

    #[test]
    fn map_value_type_is_bracket_balanced() {
        assert_eq!(map_value_type("map[string]int"), Some("int"));
        assert_eq!(map_value_type("map[[2]int]string"), Some("string"));
        assert_eq!(map_value_type("[]int"), None);
    }
}
