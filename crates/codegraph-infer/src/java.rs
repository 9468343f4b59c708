//! Java expression type inference.
//!
//! Dispatches on `node.kind()`. No cycle guard is needed here — a Java
//! `object` child is always structurally smaller than its parent
//! `method_invocation`/`field_access`, so the recursion always terminates.

use tree_sitter::Node;

use crate::context::ExprContext;
use crate::heuristics::{heuristic_field_type, heuristic_method_return, numeric_promotion};

/// Infers the type of `node`. Returns `None` on a miss.
#[must_use]
pub fn infer_type<'a>(node: Node, ctx: &ExprContext<'a>) -> Option<String> {
    match node.kind() {
        "string_literal" => Some("String".to_string()),

        k if k.contains("integer_literal") => {
            let text = ctx.text(node);
            if text.ends_with(['L', 'l']) {
                Some("long".to_string())
            } else {
                Some("int".to_string())
            }
        }
        k if k.contains("floating_point_literal") => {
            let text = ctx.text(node);
            if text.ends_with(['f', 'F']) {
                Some("float".to_string())
            } else {
                Some("double".to_string())
            }
        }
        "true" | "false" => Some("boolean".to_string()),
        "character_literal" => Some("char".to_string()),
        "null_literal" => Some("null".to_string()),

        "identifier" => ctx.scope.type_of(ctx.text(node)).map(str::to_string),

        "object_creation_expression" => {
            let type_node = node.child_by_field_name("type")?;
            Some(qualify(&raw_type_name(type_node, ctx), ctx))
        }

        "cast_expression" => {
            let type_node = node.child_by_field_name("type")?;
            Some(qualify(&raw_type_name(type_node, ctx), ctx))
        }

        "method_invocation" => infer_method_invocation(node, ctx),

        "field_access" => infer_field_access(node, ctx),

        "array_access" => {
            let array = node.child_by_field_name("array")?;
            let array_type = infer_type(array, ctx)?;
            array_type.strip_suffix("[]").map(str::to_string)
        }

        "binary_expression" => infer_binary_expression(node, ctx),

        "ternary_expression" => infer_ternary_expression(node, ctx),

        "parenthesized_expression" => {
            let inner = first_named_child(node)?;
            infer_type(inner, ctx)
        }

        "unary_expression" => {
            let operand = first_named_child(node)?;
            infer_type(operand, ctx)
        }

        "this" => None,

        "array_creation_expression" => {
            let type_node = node.child_by_field_name("type")?;
            Some(format!("{}[]", qualify(&raw_type_name(type_node, ctx), ctx)))
        }

        _ => None,
    }
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let result = node.named_children(&mut cursor).next();
    result
}

/// Strips generics down to the raw type name: `Generic<T>` -> `Generic`.
fn raw_type_name(node: Node, ctx: &ExprContext) -> String {
    if node.kind() == "generic_type" {
        if let Some(base) = first_named_child(node) {
            return ctx.text(base).to_string();
        }
    }
    ctx.text(node).to_string()
}

/// Resolves a written type name against the symbol table's imports/package
/// view so receiver-type lookups downstream match the qualified owner names
/// the scanner registered. Falls back to the short name itself for types the
/// scan never declared (stdlib, external deps) — those lookups correctly
/// come up empty rather than matching the wrong owner.
fn qualify(raw: &str, ctx: &ExprContext) -> String {
    if raw.contains('.') {
        return raw.to_string();
    }
    ctx.symbols
        .resolve_type(raw, ctx.file)
        .unwrap_or_else(|| raw.to_string())
}

fn infer_method_invocation(node: Node, ctx: &ExprContext) -> Option<String> {
    let name_node = node.child_by_field_name("name")?;
    let method_name = ctx.text(name_node);

    let receiver_type = node
        .child_by_field_name("object")
        .and_then(|object| infer_type(object, ctx));

    if let Some(receiver_type) = &receiver_type {
        // Known symbol-table return type always wins over the heuristic table.
        for signature in ctx.symbols.overloads_of(&format!("{receiver_type}.{method_name}")) {
            if let Some(rt) = ctx
                .symbols
                .return_type_of(&format!("{receiver_type}.{method_name}"), signature)
            {
                return Some(rt.to_string());
            }
        }
    }

    heuristic_method_return(method_name).map(str::to_string)
}

fn infer_field_access(node: Node, ctx: &ExprContext) -> Option<String> {
    let field_node = node.child_by_field_name("field")?;
    let field_name = ctx.text(field_node);

    let owner_type = node
        .child_by_field_name("object")
        .and_then(|object| infer_type(object, ctx));

    if let Some(owner_type) = &owner_type {
        if let Some(field_type) = ctx.symbols.field_type(owner_type, field_name) {
            return Some(field_type.to_string());
        }
    }

    heuristic_field_type(field_name).map(str::to_string)
}

fn infer_binary_expression(node: Node, ctx: &ExprContext) -> Option<String> {
    let left = node.child_by_field_name("left")?;
    let right = node.child_by_field_name("right")?;
    let operator = binary_operator_text(node, ctx)?;

    let left_type = infer_type(left, ctx);
    let right_type = infer_type(right, ctx);

    if operator == "+" && (left_type.as_deref() == Some("String") || right_type.as_deref() == Some("String")) {
        return Some("String".to_string());
    }

    if matches!(operator, "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||") {
        return Some("boolean".to_string());
    }

    match (left_type, right_type) {
        (Some(l), Some(r)) => Some(numeric_promotion(&l, &r).to_string()),
        (Some(l), None) => Some(l),
        (None, Some(r)) => Some(r),
        (None, None) => None,
    }
}

/// tree-sitter-java does not expose the binary operator as a named field;
/// it sits as the single unnamed token between `left` and `right`.
fn binary_operator_text<'a>(node: Node, ctx: &ExprContext<'a>) -> Option<&'a str> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.is_named() {
            return Some(ctx.text(child));
        }
    }
    None
}

fn infer_ternary_expression(node: Node, ctx: &ExprContext) -> Option<String> {
    let consequence = node.child_by_field_name("consequence")?;
    let alternative = node.child_by_field_name("alternative")?;

    let then_type = infer_type(consequence, ctx);
    let else_type = infer_type(alternative, ctx);

    match (then_type, else_type) {
        (Some(a), Some(b)) if a == b => Some(a),
        (Some(a), Some(b)) if a == "null" => Some(b),
        (Some(a), Some(b)) if b == "null" => Some(a),
        (Some(a), Some(b)) => Some(numeric_promotion(&a, &b).to_string()),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
