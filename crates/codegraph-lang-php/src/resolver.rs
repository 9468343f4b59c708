//! Phase 2: re-walk every PHP file, building IR entities and resolving
//! `extends`/`implements` against the symbol table built in Phase 1.
//!
//! PHP's dynamic call semantics (variable-variables, `$obj->$method()`,
//! magic `__call`) make static call-site resolution unsound in the general
//! case, so this resolver — like the teacher's Java/Go resolvers — builds
//! types and callables but does not attempt to walk method bodies for call
//! edges. A `__call` declaration is recorded as a standing
//! `UnresolvedReference`, flagging the type as using dynamic dispatch for
//! anything downstream that cares.

use std::path::Path;

use codegraph_common::error::AnalysisError;
use codegraph_common::ids::EntityIdHasher;
use codegraph_common::language::LanguageTag;
use codegraph_ir::{Callable, CallableKind, IrRoot, Module, Type, TypeKind, UnresolvedReference, Visibility};
use codegraph_symbols::{FileContext, SymbolTable};
use rustc_hash::FxHashMap;
use tree_sitter::Node;

use crate::ast;
use crate::scanner;

pub fn resolve_references(
    source_root: &Path,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
) -> Result<IrRoot, AnalysisError> {
    let files = scanner::collect_php_files(source_root)?;
    let parsed = scanner::parse_all(source_root, &files);

    let mut ir = IrRoot::new("1", LanguageTag::Php);
    let mut module_index: FxHashMap<String, usize> = FxHashMap::default();

    for file in &parsed {
        let root = file.tree.root_node();
        let namespace = ast::namespace_name(root, &file.source);
        let use_aliases = ast::use_map(root, &file.source);
        let imports: Vec<String> = {
            let mut names: Vec<String> = use_aliases.iter().map(|(_, qualified)| qualified.clone()).collect();
            names.sort();
            names.dedup();
            names
        };
        let file_ctx = FileContext {
            package: namespace.clone(),
            imports,
            wildcard_imports: Vec::new(),
            local_aliases: use_aliases.into_iter().collect(),
        };

        let module_idx = if namespace.is_empty() {
            None
        } else {
            let module_id = hasher.type_id(project_id, LanguageTag::Php, &namespace);
            Some(*module_index.entry(namespace.clone()).or_insert_with(|| {
                ir.modules.push(Module {
                    id: module_id.clone(),
                    simple_name: namespace.rsplit('.').next().unwrap_or(&namespace).to_string(),
                    qualified_name: namespace.clone(),
                    path: file.rel_path.clone(),
                    language: LanguageTag::Php,
                    declared_types: Vec::new(),
                    sub_modules: Vec::new(),
                });
                ir.modules.len() - 1
            }))
        };

        process_declarations(
            root,
            &file.source,
            &namespace,
            &file_ctx,
            symbols,
            project_id,
            hasher,
            &mut ir,
            module_idx,
        );
    }

    Ok(ir)
}

#[allow(clippy::too_many_arguments)]
fn process_declarations(
    node: Node,
    source: &str,
    namespace: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    module_idx: Option<usize>,
) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        if ast::TYPE_DECL_KINDS.contains(&child.kind()) {
            process_type(
                child, source, namespace, file_ctx, symbols, project_id, hasher, ir, module_idx,
            );
            continue;
        }
        if child.kind() == "function_definition" {
            process_function(child, source, namespace, project_id, hasher, ir);
            continue;
        }
        process_declarations(
            child, source, namespace, file_ctx, symbols, project_id, hasher, ir, module_idx,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn process_type(
    decl: Node,
    source: &str,
    namespace: &str,
    file_ctx: &FileContext,
    symbols: &SymbolTable,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    module_idx: Option<usize>,
) {
    let Some(name_node) = decl.child_by_field_name("name") else {
        return;
    };
    let short_name = ast::text(name_node, source).to_string();
    let qualified_name = if namespace.is_empty() {
        short_name.clone()
    } else {
        format!("{namespace}.{short_name}")
    };
    let type_id = hasher.type_id(project_id, LanguageTag::Php, &qualified_name);

    let kind = match decl.kind() {
        "interface_declaration" => TypeKind::Interface,
        "trait_declaration" => TypeKind::Trait,
        _ => TypeKind::Class,
    };

    let (extends_names, implements_names) = ast::supertype_names(decl, source);
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
        language: LanguageTag::Php,
        modifiers: ast::modifiers(decl, source),
        annotations: Vec::new(),
        stereotypes: Vec::new(),
        extends,
        implements,
        embeds: Vec::new(),
        callables: Vec::new(),
    };

    if let Some(body) = decl.child_by_field_name("body") {
        process_methods(body, source, &qualified_name, project_id, hasher, ir, &mut type_entity);
    }

    ir.types.push(type_entity);
    if let Some(idx) = module_idx {
        ir.modules[idx].declared_types.push(type_id);
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
    hasher.type_id(project_id, LanguageTag::Php, &qualified)
}

fn process_methods(
    body: Node,
    source: &str,
    owner_qualified_name: &str,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
    owner_type: &mut Type,
) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() != "method_declaration" {
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
        let callable_id = hasher.callable_id(project_id, LanguageTag::Php, &qualified_name, &signature);

        let modifiers = ast::modifiers(member, source);
        let is_static = modifiers.iter().any(|m| m == "static");
        let visibility = visibility_from_modifiers(&modifiers);
        let kind = if short_name == "__construct" {
            CallableKind::Constructor
        } else {
            CallableKind::Method
        };

        ir.callables.push(Callable {
            id: callable_id.clone(),
            simple_name: short_name.clone(),
            qualified_name,
            kind,
            language: LanguageTag::Php,
            signature,
            is_static,
            visibility,
            return_type: None,
            annotations: Vec::new(),
            stereotypes: Vec::new(),
            routes: Vec::new(),
            calls: Vec::new(),
            overrides: None,
        });
        owner_type.callables.push(callable_id.clone());

        // PHP's magic `__call` hands off unknown method invocations to
        // dynamic dispatch at runtime; there is no static target to record,
        // so the presence of the hook itself becomes the signal.
        if short_name == "__call" {
            ir.unresolved_references.push(UnresolvedReference {
                source_callable: callable_id,
                target_name: "*".to_string(),
                context: Some("__call dynamic dispatch".to_string()),
                reason: "Dynamic method dispatch in PHP".to_string(),
            });
        }
    }
}

fn process_function(
    decl: Node,
    source: &str,
    namespace: &str,
    project_id: &str,
    hasher: EntityIdHasher,
    ir: &mut IrRoot,
) {
    let Some(name_node) = decl.child_by_field_name("name") else {
        return;
    };
    let short_name = ast::text(name_node, source).to_string();
    let qualified_name = if namespace.is_empty() {
        short_name.clone()
    } else {
        format!("{namespace}.{short_name}")
    };
    let Some(params) = decl.child_by_field_name("parameters") else {
        return;
    };
    let signature = ast::canonical_signature(params, source);
    let callable_id = hasher.callable_id(project_id, LanguageTag::Php, &qualified_name, &signature);

    ir.callables.push(Callable {
        id: callable_id,
        simple_name: short_name,
        qualified_name,
        kind: CallableKind::Function,
        language: LanguageTag::Php,
        signature,
        is_static: false,
        visibility: Visibility::Public,
        return_type: None,
        annotations: Vec::new(),
        stereotypes: Vec::new(),
        routes: Vec::new(),
        calls: Vec::new(),
        overrides: None,
    });
}

fn visibility_from_modifiers(modifiers: &[String]) -> Visibility {
    if modifiers.iter().any(|m| m == "private") {
        Visibility::Private
    } else if modifiers.iter().any(|m| m == "protected") {
        Visibility::Protected
    } else {
        Visibility::Public
    }
}
