//! Phase 2: re-walk every Java file, building IR entities and resolving call
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

const TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

pub fn resolve_references(
    source_root: &Path,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
) -> Result<IrRoot, AnalysisError> {
    let files = scanner::collect_java_files(source_root)?;
    let parsed = scanner::parse_all(source_root, &files);

    let mut ir = IrRoot::new("1", LanguageTag::Java);
    let mut module_index: FxHashMap<String, usize> = FxHashMap::default();

    for file in &parsed {
        let root = file.tree.root_node();
        let package = ast::package_name(root, &file.source);
        let (imports, wildcard_imports) = ast::imports(root, &file.source);
        let file_ctx = FileContext {
            package: package.clone(),
            imports,
            wildcard_imports,
            local_aliases: Default::default(),
        };

        let module_id = hasher.type_id(project_id, LanguageTag::Java, &package);
        let module_idx = *module_index.entry(package.clone()).or_insert_with(|| {
            ir.modules.push(Module {
                id: module_id.clone(),
                simple_name: package.rsplit('.').next().unwrap_or(&package).to_string(),
                qualified_name: package.clone(),
                path: file.rel_path.clone(),
                language: LanguageTag::Java,
                declared_types: Vec::new(),
                sub_modules: Vec::new(),
            });
            ir.modules.len() - 1
        });

        process_type_decls(
            root,
            &file.source,
            &package,
            &file_ctx,
            symbols,
            project_id,
            hasher,
            &mut ir,
            module_idx,
            true,
        );
    }

    Ok(ir)
}

#[allow(clippy::too_many_arguments)]
fn process_type_decls(
    node: Node,
    source: &str,
    qualifier: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    module_idx: usize,
    is_top_level: bool,
) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if !TYPE_DECL_KINDS.contains(&child.kind()) {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name") else {
            continue;
        };
        let short_name = ast::text(name_node, source).to_string();
        let qualified_name = if qualifier.is_empty() {
            short_name.clone()
        } else {
            format!("{qualifier}.{short_name}")
        };
        let type_id = hasher.type_id(project_id, LanguageTag::Java, &qualified_name);

        let kind = match child.kind() {
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            _ => TypeKind::Class,
        };

        let (extends_names, implements_names) = ast::supertype_names(child, source);
        let extends: Vec<String> = extends_names
            .iter()
            .map(|n| resolve_supertype_id(n, file_ctx, symbols, project_id, hasher))
            .collect();
        let implements: Vec<String> = implements_names
            .iter()
            .map(|n| resolve_supertype_id(n, file_ctx, symbols, project_id, hasher))
            .collect();

        let mut type_entity = Type {
            id: type_id.clone(),
            simple_name: short_name,
            qualified_name: qualified_name.clone(),
            kind,
            language: LanguageTag::Java,
            modifiers: ast::modifiers(child, source),
            annotations: ast::annotations(child, source),
            stereotypes: Vec::new(),
            extends,
            implements,
            embeds: Vec::new(),
            callables: Vec::new(),
        };

        if let Some(body) = child.child_by_field_name("body") {
            process_callables(
                body,
                source,
                &qualified_name,
                file_ctx,
                symbols,
                project_id,
                hasher,
                ir,
                &mut type_entity,
            );
        }

        ir.types.push(type_entity);
        if is_top_level {
            ir.modules[module_idx].declared_types.push(type_id);
        }

        if let Some(body) = child.child_by_field_name("body") {
            process_type_decls(
                body, source, &qualified_name, file_ctx, symbols, project_id, hasher, ir,
                module_idx, false,
            );
        }
    }
}

fn resolve_supertype_id(
    short_name: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
) -> String {
    let qualified = symbols.resolve_type(short_name, file_ctx).unwrap_or_else(|| {
        if file_ctx.package.is_empty() {
            short_name.to_string()
        } else {
            format!("{}.{short_name}", file_ctx.package)
        }
    });
    hasher.type_id(project_id, LanguageTag::Java, &qualified)
}

#[allow(clippy::too_many_arguments)]
fn process_callables(
    body: Node,
    source: &str,
    owner_qualified_name: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    owner_type: &mut Type,
) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() != "method_declaration" && member.kind() != "constructor_declaration" {
            continue;
        }
        let Some(name_node) = member.child_by_field_name("name") else {
            continue;
        };
        let short_name = ast::text(name_node, source).to_string();
        let qualified_name = format!("{owner_qualified_name}.{short_name}");
        let Some(params) = member.child_by_field_name("parameters") else {
            continue;
        };
        let signature = ast::canonical_signature(params, source);
        let callable_id = hasher.callable_id(project_id, LanguageTag::Java, &qualified_name, &signature);

        let modifiers = ast::modifiers(member, source);
        let annotations = ast::annotations(member, source);
        let is_static = modifiers.iter().any(|m| m == "static");
        let visibility = visibility_from_modifiers(&modifiers);
        let return_type = member.child_by_field_name("type").and_then(|t| {
            if t.kind() == "void_type" {
                return None;
            }
            let resolved = symbols.resolve_type(&ast::raw_type_name(t, source), file_ctx)?;
            Some(hasher.type_id(project_id, LanguageTag::Java, &resolved))
        });
        let kind = if member.kind() == "constructor_declaration" {
            CallableKind::Constructor
        } else {
            CallableKind::Method
        };

        let overrides = if annotations.iter().any(|a| a == "Override") {
            find_overridden(&short_name, &signature, owner_type, symbols, project_id, hasher)
        } else {
            None
        };

        let mut scope = LocalScope::new();
        for (name, ty) in ast::parameter_bindings(params, source) {
            scope.bind(name, scanner::qualify_type(&ty, file_ctx, symbols));
        }

        let mut calls = Vec::new();
        let mut unresolved = Vec::new();
        if let Some(member_body) = member.child_by_field_name("body") {
            walk_body(
                member_body,
                source,
                owner_qualified_name,
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
            kind,
            language: LanguageTag::Java,
            signature,
            is_static,
            visibility,
            return_type,
            annotations,
            stereotypes: Vec::new(),
            routes: Vec::new(),
            calls,
            overrides,
        });
        ir.unresolved_references.extend(unresolved);
        owner_type.callables.push(callable_id);
    }
}

fn visibility_from_modifiers(modifiers: &[String]) -> Visibility {
    if modifiers.iter().any(|m| m == "public") {
        Visibility::Public
    } else if modifiers.iter().any(|m| m == "private") {
        Visibility::Private
    } else if modifiers.iter().any(|m| m == "protected") {
        Visibility::Protected
    } else {
        Visibility::Package
    }
}

fn find_overridden(
    method_name: &str,
    signature: &str,
    owner_type: &Type,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
) -> Option<String> {
    // `owner_type.extends`/`implements` are already ids at this point, but
    // the symbol table indexes by qualified name, so walk the raw supertype
    // qualified names recorded in Phase 1 instead.
    for super_qualified in symbols.supertypes(&owner_type.qualified_name) {
        let candidate = format!("{super_qualified}.{method_name}");
        if symbols.signature_of(&candidate, signature).is_some() {
            return Some(hasher.callable_id(project_id, LanguageTag::Java, &candidate, signature));
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn walk_body(
    node: Node,
    source: &str,
    owner_qualified_name: &str,
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
        "local_variable_declaration" => {
            if let Some(type_node) = node.child_by_field_name("type") {
                let declared = ast::text(type_node, source);
                let mut cursor = node.walk();
                for declarator in node.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name_node) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    let var_name = ast::text(name_node, source).to_string();
                    let var_type = if declared == "var" {
                        declarator
                            .child_by_field_name("value")
                            .and_then(|value| {
                                let ctx = ExprContext::new(symbols, scope, file_ctx, source);
                                codegraph_infer::java::infer_type(value, &ctx)
                            })
                    } else {
                        Some(scanner::qualify_type(
                            &ast::raw_type_name(type_node, source),
                            file_ctx,
                            symbols,
                        ))
                    };
                    if let Some(var_type) = var_type {
                        scope.bind(var_name, var_type);
                    }
                }
            }
        }
        "enhanced_for_statement" => {
            if let (Some(type_node), Some(name_node)) = (
                node.child_by_field_name("type"),
                node.child_by_field_name("name"),
            ) {
                let declared = ast::text(type_node, source);
                if declared != "var" {
                    scope.bind(
                        ast::text(name_node, source).to_string(),
                        scanner::qualify_type(&ast::raw_type_name(type_node, source), file_ctx, symbols),
                    );
                }
            }
        }
        "catch_clause" => {
            if let Some(param) = ast::find_child_of_kind(node, "catch_formal_parameter") {
                if let (Some(type_node), Some(name_node)) = (
                    param.child_by_field_name("type"),
                    param.child_by_field_name("name"),
                ) {
                    scope.bind(
                        ast::text(name_node, source).to_string(),
                        scanner::qualify_type(&ast::raw_type_name(type_node, source), file_ctx, symbols),
                    );
                }
            }
        }
        "method_invocation" => {
            resolve_call_site(
                node,
                source,
                owner_qualified_name,
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
            owner_qualified_name,
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

#[allow(clippy::too_many_arguments)]
fn resolve_call_site(
    node: Node,
    source: &str,
    owner_qualified_name: &str,
    source_callable_id: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    scope: &LocalScope,
    calls: &mut Vec<String>,
    unresolved: &mut Vec<UnresolvedReference>,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let method_name = ast::text(name_node, source).to_string();

    let ctx = ExprContext::new(symbols, scope, file_ctx, source);
    let receiver_type = match node.child_by_field_name("object") {
        // `this` is resolved directly against the enclosing type rather than
        // through the general inferrer, which treats a bare `this` node as a
        // miss (it has no callable-body context to resolve it against).
        Some(object) if object.kind() == "this" => Some(owner_qualified_name.to_string()),
        Some(object) => codegraph_infer::java::infer_type(object, &ctx),
        // No explicit receiver: implicit `this`, i.e. the enclosing type.
        None => Some(owner_qualified_name.to_string()),
    };

    let inferred_signature = node
        .child_by_field_name("arguments")
        .map(|args| inferred_argument_signature(args, &ctx))
        .unwrap_or_else(|| "()".to_string());

    match symbols.resolve_callable_with_receiver(
        &method_name,
        receiver_type.as_deref(),
        Some(&inferred_signature),
    ) {
        Ok(callee_qualified_name) => {
            let declared_signature = final_signature(symbols, &callee_qualified_name, &inferred_signature);
            calls.push(hasher.callable_id(
                project_id,
                LanguageTag::Java,
                &callee_qualified_name,
                &declared_signature,
            ));
        }
        Err(reason) if reason.starts_with("Method not found: ") => {
            // No callable of this name exists anywhere in the scanned tree:
            // an external/library call, tolerated silently.
        }
        Err(reason) => {
            unresolved.push(UnresolvedReference {
                source_callable: source_callable_id.to_string(),
                target_name: method_name,
                context: receiver_type,
                reason,
            });
        }
    }
}

fn inferred_argument_signature(arguments: Node, ctx: &ExprContext) -> String {
    let mut parts = Vec::new();
    let mut cursor = arguments.walk();
    for arg in arguments.named_children(&mut cursor) {
        let ty = codegraph_infer::java::infer_type(arg, ctx).unwrap_or_else(|| "?".to_string());
        parts.push(ty);
    }
    format!("({})", parts.join(", "))
}

fn final_signature(symbols: &SymbolTable, callee_qualified_name: &str, inferred_signature: &str) -> String {
    if symbols
        .signature_of(callee_qualified_name, inferred_signature)
        .is_some()
    {
        return inferred_signature.to_string();
    }
    let overloads = symbols.overloads_of(callee_qualified_name);
    if overloads.len() == 1 {
        return overloads[0].clone();
    }
    let inferred_arity = arity_of(inferred_signature);
    overloads
        .iter()
        .find(|s| arity_of(s) == inferred_arity)
        .or_else(|| overloads.first())
        .cloned()
        .unwrap_or_else(|| inferred_signature.to_string())
}

fn arity_of(signature: &str) -> usize {
    let inner = signature.trim_start_matches('(').trim_end_matches(')');
    if inner.is_empty() {
        0
    } else {
        inner.split(", ").count()
    }
}
