//! Phase 1: walk every PHP file, registering every class/interface/trait and
//! function/method with its signature.

use std::fs;
use std::path::{Path, PathBuf};

use codegraph_common::error::AnalysisError;
use codegraph_symbols::{FileContext, SymbolTable};
use tree_sitter::{Node, Parser, Tree};
use walkdir::WalkDir;

use crate::ast;

pub(crate) struct ParsedFile {
    pub rel_path: String,
    pub source: String,
    pub tree: Tree,
}

pub(crate) fn collect_php_files(source_root: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
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
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn parse_all(source_root: &Path, files: &[PathBuf]) -> Vec<ParsedFile> {
    let mut parser = Parser::new();
    if parser.set_language(&tree_sitter_php::LANGUAGE_PHP.into()).is_err() {
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
        out.push(ParsedFile { rel_path, source, tree });
    }
    out
}

pub fn build_symbol_table(source_root: &Path) -> Result<SymbolTable, AnalysisError> {
    let files = collect_php_files(source_root)?;
    let parsed = parse_all(source_root, &files);
    let mut symbols = SymbolTable::new();

    // Pass 1: register every type under its namespace-qualified name so
    // pass 2's `extends`/`implements` resolution sees the complete map
    // regardless of scan order.
    for file in &parsed {
        let namespace = ast::namespace_name(file.tree.root_node(), &file.source);
        if !namespace.is_empty() {
            symbols.register_module(&namespace, &namespace);
        }
        register_declarations(file.tree.root_node(), &file.source, &namespace, &mut symbols);
    }

    Ok(symbols)
}

fn register_declarations(node: Node, source: &str, namespace: &str, symbols: &mut SymbolTable) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if ast::TYPE_DECL_KINDS.contains(&child.kind()) {
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let short_name = ast::text(name_node, source);
            let qualified_name = qualify(namespace, short_name);
            symbols.register_type(short_name, &qualified_name);

            if let Some(body) = child.child_by_field_name("body") {
                register_methods(body, source, &qualified_name, symbols);
            }
            continue;
        }

        if child.kind() == "function_definition" {
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let short_name = ast::text(name_node, source);
            let qualified_name = qualify(namespace, short_name);
            let Some(params) = child.child_by_field_name("parameters") else {
                continue;
            };
            let signature = ast::canonical_signature(params, source);
            symbols.register_callable(short_name, &qualified_name, &signature, None);
            continue;
        }

        register_declarations(child, source, namespace, symbols);
    }
}

fn register_methods(body: Node, source: &str, owner_qualified_name: &str, symbols: &mut SymbolTable) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() != "method_declaration" {
            continue;
        }
        let Some(name_node) = member.child_by_field_name("name") else {
            continue;
        };
        let short_name = ast::text(name_node, source);
        let qualified_name = format!("{owner_qualified_name}.{short_name}");
        let Some(params) = member.child_by_field_name("parameters") else {
            continue;
        };
        let signature = ast::canonical_signature(params, source);
        symbols.register_callable(short_name, &qualified_name, &signature, None);
    }
}

fn qualify(namespace: &str, short_name: &str) -> String {
    if namespace.is_empty() {
        short_name.to_string()
    } else {
        format!("{namespace}.{short_name}")
    }
}
