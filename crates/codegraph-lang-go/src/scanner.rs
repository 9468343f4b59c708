//! Phase 1: walk every Go file, registering every struct/interface and
//! function/method with its signature, and collecting embedding edges.

use std::fs;
use std::path::{Path, PathBuf};

use codegraph_common::error::AnalysisError;
use codegraph_symbols::{FileContext, SymbolTable};
use tree_sitter::{Node, Parser, Tree};
use walkdir::WalkDir;

use crate::ast;

pub(crate) struct ParsedFile {
    pub rel_path: String,
    pub package: String,
    pub source: String,
    pub tree: Tree,
}

pub(crate) fn collect_go_files(source_root: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    if !source_root.is_dir() {
        return Err(AnalysisError::InvalidSourceRoot(source_root.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(source_root)
        .into_iter()
        .filter_entry(|e| {
            e.file_type().is_file()
                || !codegraph_common::limits::SKIPPED_DIRECTORY_NAMES
                    .contains(&e.file_name().to_string_lossy().as_ref())
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "go"))
        .filter(|e| {
            !e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_test.go"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn parse_all(source_root: &Path, files: &[PathBuf]) -> Vec<ParsedFile> {
    let mut parser = Parser::new();
    if parser.set_language(&tree_sitter_go::LANGUAGE.into()).is_err() {
        return Vec::new();
    }
    let module_name = ast::read_module_name(source_root);

    let mut out = Vec::new();
    for path in files {
        let Ok(source) = fs::read_to_string(path) else {
            tracing::warn!(path = %path.display(), "failed to read file, skipping");
            continue;
        };
        let Some(tree) = parser.parse(&source, None) else {
            tracing::warn!(path = %path.display(), "tree-sitter failed to parse, skipping");
            continue;
        };
        let rel_path = path
            .strip_prefix(source_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        let package_clause = ast::package_clause_name(tree.root_node(), &source);
        let package = ast::qualified_package_name(module_name.as_deref(), source_root, path, &package_clause);
        out.push(ParsedFile {
            rel_path,
            package,
            source,
            tree,
        });
    }
    out
}

pub fn build_symbol_table(source_root: &Path) -> Result<SymbolTable, AnalysisError> {
    let files = collect_go_files(source_root)?;
    let parsed = parse_all(source_root, &files);
    let mut symbols = SymbolTable::new();

    // Pass 1: register every struct/interface type under its qualified name
    // so pass 2's embedding resolution sees the complete cross-package map.
    for file in &parsed {
        symbols.register_module(&file.package, &file.package);
        register_types(file.tree.root_node(), &file.source, &file.package, &mut symbols);
    }

    // Pass 2: register fields, embedding edges, functions, and methods.
    for file in &parsed {
        let ctx = FileContext::new(file.package.clone());
        register_members(file.tree.root_node(), &file.source, &file.package, &ctx, &mut symbols);
    }

    Ok(symbols)
}

fn register_types(root: Node, source: &str, package: &str, symbols: &mut SymbolTable) {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "type_declaration" {
            continue;
        }
        let mut spec_cursor = child.walk();
        for spec in child.named_children(&mut spec_cursor) {
            if spec.kind() != "type_spec" {
                continue;
            }
            let Some(name_node) = spec.child_by_field_name("name") else {
                continue;
            };
            let short_name = ast::text(name_node, source);
            let qualified_name = format!("{package}.{short_name}");
            symbols.register_type(short_name, &qualified_name);
        }
    }
}

fn register_members(
    root: Node,
    source: &str,
    package: &str,
    ctx: &FileContext,
    symbols: &mut SymbolTable,
) {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "type_declaration" => register_type_members(child, source, package, ctx, symbols),
            "function_declaration" => register_function(child, source, package, symbols),
            "method_declaration" => register_method(child, source, package, symbols),
            _ => {}
        }
    }
}

fn register_type_members(
    decl: Node,
    source: &str,
    package: &str,
    ctx: &FileContext,
    symbols: &mut SymbolTable,
) {
    let mut spec_cursor = decl.walk();
    for spec in decl.named_children(&mut spec_cursor) {
        if spec.kind() != "type_spec" {
            continue;
        }
        let (Some(name_node), Some(type_node)) =
            (spec.child_by_field_name("name"), spec.child_by_field_name("type"))
        else {
            continue;
        };
        let short_name = ast::text(name_node, source);
        let qualified_name = format!("{package}.{short_name}");

        match type_node.kind() {
            "struct_type" => {
                let embedded = ast::embedded_field_names(type_node, source);
                let resolved: Vec<String> = embedded
                    .iter()
                    .map(|name| resolve_cross_package_type(&ast::strip_pointer_prefix(name), ctx, symbols))
                    .collect();
                symbols.register_supertypes(&qualified_name, resolved);

                for (field_name, field_type) in ast::named_fields(type_node, source) {
                    symbols.register_field(&qualified_name, &field_name, &field_type);
                }
            }
            "interface_type" => {
                let embedded = ast::embedded_interface_names(type_node, source);
                let resolved: Vec<String> = embedded
                    .iter()
                    .map(|name| resolve_cross_package_type(name, ctx, symbols))
                    .collect();
                symbols.register_supertypes(&qualified_name, resolved);
            }
            _ => {}
        }
    }
}

fn register_function(decl: Node, source: &str, package: &str, symbols: &mut SymbolTable) {
    let Some(name_node) = decl.child_by_field_name("name") else {
        return;
    };
    let short_name = ast::text(name_node, source);
    let qualified_name = format!("{package}.{short_name}");
    let Some(params) = decl.child_by_field_name("parameters") else {
        return;
    };
    let signature = ast::canonical_signature(params, source);
    let return_type = ast::result_type(decl, source);
    symbols.register_callable(short_name, &qualified_name, &signature, return_type.as_deref());
}

fn register_method(decl: Node, source: &str, package: &str, symbols: &mut SymbolTable) {
    let Some(name_node) = decl.child_by_field_name("name") else {
        return;
    };
    let Some((_, receiver_type)) = ast::receiver_binding(decl, source) else {
        return;
    };
    let owner = ast::strip_pointer_prefix(&receiver_type);
    let owner_qualified_name = format!("{package}.{owner}");
    let short_name = ast::text(name_node, source);
    let qualified_name = format!("{owner_qualified_name}.{short_name}");
    let Some(params) = decl.child_by_field_name("parameters") else {
        return;
    };
    let signature = ast::canonical_signature(params, source);
    let return_type = ast::result_type(decl, source);
    symbols.register_callable(short_name, &qualified_name, &signature, return_type.as_deref());
}

/// Same-package-first, then the sole cross-package candidate if unique,
/// else assume same-package (a forward reference the scanner hasn't seen
/// registered under another package yet).
pub(crate) fn resolve_cross_package_type(short_name: &str, ctx: &FileContext, symbols: &SymbolTable) -> String {
    symbols
        .resolve_type(short_name, ctx)
        .unwrap_or_else(|| same_package_guess(ctx, short_name))
}

pub(crate) fn same_package_guess(ctx: &FileContext, short_name: &str) -> String {
    format!("{}.{short_name}", ctx.package)
}
