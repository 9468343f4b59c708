//! Phase 2: re-walk every Go file, building IR entities and resolving call
//! sites against the symbol table built in Phase 1.

use std::path::Path;

use codegraph_common::error::AnalysisError;
use codegraph_common::ids::EntityIdHasher;
use codegraph_common::language::LanguageTag;
use codegraph_infer::ExprContext;
use codegraph_ir::{Callable, CallableKind, IrRoot, Module, Type, TypeKind, UnresolvedReference, Visibility};
use codegraph_symbols::{FileContext, LocalScope, SymbolTable};
use rustc_hash::FxHashMap;
use tree_sitter::Node;

use crate::ast;
use crate::scanner;

fn resolve_return_type(
    decl: Node,
    source: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
) -> Option<String> {
    let raw = ast::result_type(decl, source)?;
    let resolved = symbols.resolve_type(&ast::strip_pointer_prefix(&raw), file_ctx)?;
    Some(hasher.type_id(project_id, LanguageTag::Go, &resolved))
}

pub fn resolve_references(
    source_root: &Path,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
) -> Result<IrRoot, AnalysisError> {
    let files = scanner::collect_go_files(source_root)?;
    let parsed = scanner::parse_all(source_root, &files);

    let mut ir = IrRoot::new("1", LanguageTag::Go);
    let mut module_index: FxHashMap<String, usize> = FxHashMap::default();

    for file in &parsed {
        let file_ctx = FileContext::new(file.package.clone());
        let module_id = hasher.type_id(project_id, LanguageTag::Go, &file.package);
        let module_idx = *module_index.entry(file.package.clone()).or_insert_with(|| {
            ir.modules.push(Module {
                id: module_id.clone(),
                simple_name: file.package.rsplit('/').next().unwrap_or(&file.package).to_string(),
                qualified_name: file.package.clone(),
                path: file.rel_path.clone(),
                language: LanguageTag::Go,
                declared_types: Vec::new(),
                sub_modules: Vec::new(),
            });
            ir.modules.len() - 1
        });

        process_type_decls(
            file.tree.root_node(),
            &file.source,
            &file.package,
            &file_ctx,
            symbols,
            project_id,
            hasher,
            &mut ir,
            module_idx,
        );
        process_top_level_callables(
            file.tree.root_node(),
            &file.source,
            &file.package,
            &file_ctx,
            symbols,
            project_id,
            hasher,
            &mut ir,
        );
    }

    Ok(ir)
}

#[allow(clippy::too_many_arguments)]
fn process_type_decls(
    root: Node,
    source: &str,
    package: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    module_idx: usize,
) {
    let mut cursor = root.walk();
    for decl in root.children(&mut cursor) {
        if decl.kind() != "type_declaration" {
            continue;
        }
        let mut spec_cursor = decl.walk();
        let specs: Vec<Node> = decl.named_children(&mut spec_cursor).collect();
        for spec in specs {
            if spec.kind() != "type_spec" {
                continue;
            }
            let (Some(name_node), Some(type_node)) =
                (spec.child_by_field_name("name"), spec.child_by_field_name("type"))
            else {
                continue;
            };
            let short_name = ast::text(name_node, source).to_string();
            let qualified_name = format!("{package}.{short_name}");
            let type_id = hasher.type_id(project_id, LanguageTag::Go, &qualified_name);

            let (kind, embeds_names) = match type_node.kind() {
                "interface_type" => (TypeKind::Interface, ast::embedded_interface_names(type_node, source)),
                "struct_type" => (TypeKind::Struct, ast::embedded_field_names(type_node, source)),
                _ => continue,
            };
            let embeds: Vec<String> = embeds_names
                .iter()
                .map(|name| {
                    let bare = ast::strip_pointer_prefix(name);
                    let qualified = scanner::resolve_cross_package_type(&bare, file_ctx, symbols);
                    hasher.type_id(project_id, LanguageTag::Go, &qualified)
                })
                .collect();

            let visibility_modifier = if ast::is_exported(&short_name) { "public" } else { "package" };

            let mut type_entity = Type {
                id: type_id.clone(),
                simple_name: short_name,
                qualified_name: qualified_name.clone(),
                kind,
                language: LanguageTag::Go,
                modifiers: vec![visibility_modifier.to_string()],
                annotations: Vec::new(),
                stereotypes: Vec::new(),
                extends: Vec::new(),
                implements: Vec::new(),
                embeds,
                callables: Vec::new(),
            };

            ir.types.push(type_entity.clone());
            let type_push_idx = ir.types.len() - 1;
            ir.modules[module_idx].declared_types.push(type_id.clone());

            process_methods_for_owner(
                root,
                source,
                package,
                &qualified_name,
                file_ctx,
                symbols,
                project_id,
                hasher,
                ir,
                &mut type_entity,
            );
            ir.types[type_push_idx] = type_entity;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn process_methods_for_owner(
    root: Node,
    source: &str,
    package: &str,
    owner_qualified_name: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    owner_type: &mut Type,
) {
    let mut cursor = root.walk();
    for decl in root.children(&mut cursor) {
        if decl.kind() != "method_declaration" {
            continue;
        }
        let Some((receiver_name, receiver_type)) = ast::receiver_binding(decl, source) else {
            continue;
        };
        let receiver_owner = format!("{package}.{}", ast::strip_pointer_prefix(&receiver_type));
        if receiver_owner != owner_qualified_name {
            continue;
        }
        let Some(name_node) = decl.child_by_field_name("name") else {
            continue;
        };
        let short_name = ast::text(name_node, source).to_string();
        let qualified_name = format!("{owner_qualified_name}.{short_name}");
        let Some(params) = decl.child_by_field_name("parameters") else {
            continue;
        };
        let signature = ast::canonical_signature(params, source);
        let callable_id = hasher.callable_id(project_id, LanguageTag::Go, &qualified_name, &signature);
        let return_type = resolve_return_type(decl, source, file_ctx, symbols, project_id, hasher);

        let mut scope = LocalScope::new();
        if let Some(receiver_name) = receiver_name {
            scope.bind(receiver_name, receiver_type);
        }
        for (name, ty) in ast::parameter_bindings(params, source) {
            scope.bind(name, ty);
        }

        let mut calls = Vec::new();
        let mut unresolved = Vec::new();
        if let Some(body) = decl.child_by_field_name("body") {
            walk_body(
                body,
                source,
                &callable_id,
                file_ctx,
                symbols,
                project_id,
                hasher,
                &mut scope,
                &mut calls,
                &mut unresolved,
            );
        }

        ir.callables.push(Callable {
            id: callable_id.clone(),
            simple_name: short_name,
            qualified_name,
            kind: CallableKind::Method,
            language: LanguageTag::Go,
            signature,
            is_static: false,
            visibility: visibility_from_name(decl.child_by_field_name("name"), source),
            return_type,
            annotations: Vec::new(),
            stereotypes: Vec::new(),
            routes: Vec::new(),
            calls,
            overrides: None,
        });
        ir.unresolved_references.extend(unresolved);
        owner_type.callables.push(callable_id);
    }
}

#[allow(clippy::too_many_arguments)]
fn process_top_level_callables(
    root: Node,
    source: &str,
    package: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
) {
    let mut cursor = root.walk();
    for decl in root.children(&mut cursor) {
        if decl.kind() != "function_declaration" {
            continue;
        }
        let Some(name_node) = decl.child_by_field_name("name") else {
            continue;
        };
        let short_name = ast::text(name_node, source).to_string();
        let qualified_name = format!("{package}.{short_name}");
        let Some(params) = decl.child_by_field_name("parameters") else {
            continue;
        };
        let signature = ast::canonical_signature(params, source);
        let callable_id = hasher.callable_id(project_id, LanguageTag::Go, &qualified_name, &signature);
        let return_type = resolve_return_type(decl, source, file_ctx, symbols, project_id, hasher);

        let mut scope = LocalScope::new();
        for (name, ty) in ast::parameter_bindings(params, source) {
            scope.bind(name, ty);
        }

        let mut calls = Vec::new();
        let mut unresolved = Vec::new();
        if let Some(body) = decl.child_by_field_name("body") {
            walk_body(
                body,
                source,
                &callable_id,
                file_ctx,
                symbols,
                project_id,
                hasher,
                &mut scope,
                &mut calls,
                &mut unresolved,
            );
        }

        ir.callables.push(Callable {
            id: callable_id.clone(),
            simple_name: short_name.clone(),
            qualified_name,
            kind: CallableKind::Function,
            language: LanguageTag::Go,
            signature,
            is_static: false,
            visibility: if ast::is_exported(&short_name) {
                Visibility::Public
            } else {
                Visibility::Package
            },
            return_type,
            annotations: Vec::new(),
            stereotypes: Vec::new(),
            routes: Vec::new(),
            calls,
            overrides: None,
        });
        ir.unresolved_references.extend(unresolved);
    }
}

fn visibility_from_name(name_node: Option<Node>, source: &str) -> Visibility {
    match name_node {
        Some(n) if ast::is_exported(ast::text(n, source)) => Visibility::Public,
        _ => Visibility::Package,
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_body(
    node: Node,
    source: &str,
    source_callable_id: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    scope: &mut LocalScope,
    calls: &mut Vec<String>,
    unresolved: &mut Vec<UnresolvedReference>,
) {
    match node.kind() {
        "short_var_declaration" => {
            bind_short_var(node, source, file_ctx, symbols, scope);
        }
        "var_declaration" => {
            bind_var_spec(node, source, file_ctx, symbols, scope);
        }
        "range_clause" => {
            bind_range_clause(node, source, file_ctx, symbols, scope);
        }
        "call_expression" => {
            resolve_call_site(
                node,
                source,
                source_callable_id,
                file_ctx,
                symbols,
                project_id,
                hasher,
                scope,
                calls,
                unresolved,
            );
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_body(
            child,
            source,
            source_callable_id,
            file_ctx,
            symbols,
            project_id,
            hasher,
            scope,
            calls,
            unresolved,
        );
    }
}

fn bind_short_var(node: Node, source: &str, file_ctx: &FileContext, symbols: &SymbolTable, scope: &mut LocalScope) {
    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    let Some(right) = node.child_by_field_name("right") else {
        return;
    };
    let names: Vec<Node> = {
        let mut cursor = left.walk();
        left.named_children(&mut cursor).collect()
    };
    let values: Vec<Node> = {
        let mut cursor = right.walk();
        right.named_children(&mut cursor).collect()
    };
    if names.len() != values.len() {
        return;
    }
    for (name_node, value_node) in names.iter().zip(values.iter()) {
        let ctx = ExprContext::new(symbols, scope, file_ctx, source);
        if let Some(ty) = codegraph_infer::go::infer_type(*value_node, &ctx) {
            scope.bind(ast::text(*name_node, source).to_string(), ty);
        }
    }
}

fn bind_var_spec(node: Node, source: &str, file_ctx: &FileContext, symbols: &SymbolTable, scope: &mut LocalScope) {
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        if spec.kind() != "var_spec" {
            continue;
        }
        let names: Vec<Node> = {
            let mut name_cursor = spec.walk();
            spec.children_by_field_name("name", &mut name_cursor).collect()
        };
        if let Some(type_node) = spec.child_by_field_name("type") {
            let raw = ast::raw_type_name(type_node, source);
            let is_pointer = raw.starts_with('*');
            let bare = ast::strip_pointer_prefix(&raw);
            let resolved = scanner::resolve_cross_package_type(&bare, file_ctx, symbols);
            let declared = if is_pointer { format!("*{resolved}") } else { resolved };
            for name_node in &names {
                scope.bind(ast::text(*name_node, source).to_string(), declared.clone());
            }
            continue;
        }
        if let Some(values_list) = spec.child_by_field_name("value") {
            let mut value_cursor = values_list.walk();
            let values: Vec<Node> = values_list.named_children(&mut value_cursor).collect();
            let bindings: Vec<(String, String)> = {
                let ctx = ExprContext::new(symbols, scope, file_ctx, source);
                names
                    .iter()
                    .zip(values.iter())
                    .filter_map(|(name_node, value_node)| {
                        codegraph_infer::go::infer_type(*value_node, &ctx)
                            .map(|ty| (ast::text(*name_node, source).to_string(), ty))
                    })
                    .collect()
            };
            for (name, ty) in bindings {
                scope.bind(name, ty);
            }
        }
    }
}

fn bind_range_clause(node: Node, source: &str, file_ctx: &FileContext, symbols: &SymbolTable, scope: &mut LocalScope) {
    let Some(expr) = node.child_by_field_name("right") else {
        return;
    };
    let ctx = ExprContext::new(symbols, scope, file_ctx, source);
    let container_type = codegraph_infer::go::infer_type(expr, &ctx);
    let Some(container_type) = container_type else {
        return;
    };
    let element_type = container_type.strip_prefix("[]").map(str::to_string);

    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    let mut cursor = left.walk();
    let mut left_names: Vec<Node> = left.named_children(&mut cursor).collect();
    if left_names.is_empty() {
        return;
    }
    // `for v := range xs` binds one name to the element; `for k, v := range xs`
    // binds the second to the element and leaves the index/key untyped.
    if let (Some(value_name), Some(element_type)) = (left_names.pop(), element_type) {
        scope.bind(ast::text(value_name, source).to_string(), element_type);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_call_site(
    node: Node,
    source: &str,
    source_callable_id: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    scope: &LocalScope,
    calls: &mut Vec<String>,
    unresolved: &mut Vec<UnresolvedReference>,
) {
    let Some(function) = node.child_by_field_name("function") else {
        return;
    };

    let ctx = ExprContext::new(symbols, scope, file_ctx, source);

    if function.kind() != "selector_expression" {
        let method_name = ast::text(function, source).to_string();
        let candidate = format!("{}.{}", file_ctx.package, method_name);
        match declared_signature_if_registered(symbols, &candidate) {
            Some(signature) => {
                calls.push(hasher.callable_id(project_id, LanguageTag::Go, &candidate, &signature));
            }
            None => {
                unresolved.push(UnresolvedReference {
                    source_callable: source_callable_id.to_string(),
                    target_name: method_name,
                    context: None,
                    reason: "Function not found in symbol table".to_string(),
                });
            }
        }
        return;
    }

    let Some(operand) = function.child_by_field_name("operand") else {
        return;
    };
    let Some(field) = function.child_by_field_name("field") else {
        return;
    };
    let method_name = ast::text(field, source).to_string();
    let operand_is_call = operand.kind() == "call_expression";

    let receiver_type = codegraph_infer::go::infer_type(operand, &ctx);

    let Some(receiver_type) = receiver_type else {
        let reason = if operand_is_call {
            "Unknown receiver type from method call"
        } else {
            "Unknown receiver type"
        };
        unresolved.push(UnresolvedReference {
            source_callable: source_callable_id.to_string(),
            target_name: method_name,
            context: None,
            reason: reason.to_string(),
        });
        return;
    };

    let owner = receiver_type.trim_start_matches('*');
    match symbols.resolve_callable_with_receiver(&method_name, Some(owner), None) {
        Ok(callee_qualified_name) => {
            let declared_signature = symbols
                .overloads_of(&callee_qualified_name)
                .first()
                .cloned()
                .unwrap_or_else(|| "()".to_string());
            calls.push(hasher.callable_id(
                project_id,
                LanguageTag::Go,
                &callee_qualified_name,
                &declared_signature,
            ));
        }
        Err(reason) if reason.starts_with("Method not found: ") => {
            // No callable of this name anywhere in the scanned tree: tolerated
            // as an external/library call.
        }
        Err(reason) => {
            unresolved.push(UnresolvedReference {
                source_callable: source_callable_id.to_string(),
                target_name: method_name,
                context: Some(receiver_type),
                reason,
            });
        }
    }
}

fn declared_signature_if_registered(symbols: &SymbolTable, qualified_name: &str) -> Option<String> {
    symbols.overloads_of(qualified_name).first().cloned()
}
