//! Phase 1: walk every Java file, registering every type and callable with
//! its signature, and collecting the `extends`/`implements` hierarchy.

use std::fs;
use std::path::{Path, PathBuf};

use codegraph_common::error::AnalysisError;
use codegraph_symbols::{FileContext, SymbolTable};
use tree_sitter::{Node, Parser, Tree};
use walkdir::WalkDir;

use crate::ast;

const TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

pub(crate) struct ParsedFile {
    pub rel_path: String,
    pub source: String,
    pub tree: Tree,
}

pub(crate) fn collect_java_files(source_root: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
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
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "java"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn parse_all(source_root: &Path, files: &[PathBuf]) -> Vec<ParsedFile> {
    let mut parser = Parser::new();
    if parser.set_language(&tree_sitter_java::LANGUAGE.into()).is_err() {
        return Vec::new();
    }

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
        out.push(ParsedFile {
            rel_path,
            source,
            tree,
        });
    }
    out
}

pub fn build_symbol_table(source_root: &Path) -> Result<SymbolTable, AnalysisError> {
    let files = collect_java_files(source_root)?;
    let parsed = parse_all(source_root, &files);
    let mut symbols = SymbolTable::new();

    // Pass 1: register every type (including nested) under its qualified
    // name so pass 2 can resolve same-file and cross-file supertypes
    // regardless of file scan order.
    for file in &parsed {
        let package = ast::package_name(file.tree.root_node(), &file.source);
        symbols.register_module(&package, &package);
        register_types_recursive(file.tree.root_node(), &file.source, &package, &mut symbols);
    }

    // Pass 2: now that every type is known, register callables, fields, and
    // hierarchy edges (hierarchy needs `resolve_type`, which needs the full
    // types map from pass 1).
    for file in &parsed {
        let package = ast::package_name(file.tree.root_node(), &file.source);
        let (imports, wildcard_imports) = ast::imports(file.tree.root_node(), &file.source);
        let ctx = FileContext {
            package: package.clone(),
            imports,
            wildcard_imports,
            local_aliases: Default::default(),
        };
        register_members_recursive(
            file.tree.root_node(),
            &file.source,
            &package,
            &ctx,
            &mut symbols,
        );
    }

    Ok(symbols)
}

fn register_types_recursive(
    node: Node,
    source: &str,
    qualifier: &str,
    symbols: &mut SymbolTable,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if TYPE_DECL_KINDS.contains(&child.kind()) {
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let short_name = ast::text(name_node, source);
            let qualified_name = if qualifier.is_empty() {
                short_name.to_string()
            } else {
                format!("{qualifier}.{short_name}")
            };
            symbols.register_type(short_name, &qualified_name);

            if let Some(body) = child.child_by_field_name("body") {
                register_types_recursive(body, source, &qualified_name, symbols);
            }
        }
    }
}

fn register_members_recursive(
    node: Node,
    source: &str,
    qualifier: &str,
    ctx: &FileContext,
    symbols: &mut SymbolTable,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !TYPE_DECL_KINDS.contains(&child.kind()) {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name") else {
            continue;
        };
        let short_name = ast::text(name_node, source);
        let qualified_name = if qualifier.is_empty() {
            short_name.to_string()
        } else {
            format!("{qualifier}.{short_name}")
        };

        let (extends, implements) = ast::supertype_names(child, source);
        let resolved: Vec<String> = extends
            .iter()
            .chain(implements.iter())
            .map(|name| {
                symbols
                    .resolve_type(name, ctx)
                    .unwrap_or_else(|| same_package_guess(ctx, name))
            })
            .collect();
        symbols.register_supertypes(&qualified_name, resolved);

        if let Some(body) = child.child_by_field_name("body") {
            register_body_members(body, source, &qualified_name, ctx, symbols);
            register_members_recursive(body, source, &qualified_name, ctx, symbols);
        }
    }
}

fn register_body_members(
    body: Node,
    source: &str,
    owner_qualified_name: &str,
    ctx: &FileContext,
    symbols: &mut SymbolTable,
) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "method_declaration" | "constructor_declaration" => {
                let Some(name_node) = member.child_by_field_name("name") else {
                    continue;
                };
                let short_name = ast::text(name_node, source);
                let qualified_name = format!("{owner_qualified_name}.{short_name}");
                let Some(params) = member.child_by_field_name("parameters") else {
                    continue;
                };
                let signature = ast::canonical_signature(params, source);
                let return_type = member
                    .child_by_field_name("type")
                    .map(|t| qualify_type(&ast::raw_type_name(t, source), ctx, symbols));
                symbols.register_callable(
                    short_name,
                    &qualified_name,
                    &signature,
                    return_type.as_deref(),
                );
            }
            "field_declaration" => {
                let Some(type_node) = member.child_by_field_name("type") else {
                    continue;
                };
                let field_type = qualify_type(&ast::raw_type_name(type_node, source), ctx, symbols);
                let mut dcursor = member.walk();
                for declarator in member.named_children(&mut dcursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    if let Some(name_node) = declarator.child_by_field_name("name") {
                        symbols.register_field(
                            owner_qualified_name,
                            ast::text(name_node, source),
                            &field_type,
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

fn same_package_guess(ctx: &FileContext, short_name: &str) -> String {
    if ctx.package.is_empty() {
        short_name.to_string()
    } else {
        format!("{}.{short_name}", ctx.package)
    }
}

/// Qualifies a written type name against the symbol table's view of the
/// world so the rest of the pipeline (receiver resolution, field lookup)
/// never has to special-case a short name — falls back to the short name
/// itself for types the scan never saw declared (stdlib, external deps),
/// which correctly fails later lookups instead of silently matching.
pub(crate) fn qualify_type(raw: &str, ctx: &FileContext, symbols: &SymbolTable) -> String {
    let mut base = raw;
    let mut suffix = String::new();
    while let Some(stripped) = base.strip_suffix("[]") {
        suffix = format!("{suffix}[]");
        base = stripped;
    }
    if base.contains('.') {
        return format!("{base}{suffix}");
    }
    match symbols.resolve_type(base, ctx) {
        Some(qualified) => format!("{qualified}{suffix}"),
        None => format!("{base}{suffix}"),
    }
}
