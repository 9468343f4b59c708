//! Shared input for both type inferrers.

use codegraph_symbols::{FileContext, LocalScope, SymbolTable};

/// Everything an inferrer needs to resolve a sub-expression's type: the
/// read-only symbol table, the current local scope, the file's resolution
/// context (package/imports, for resolving a receiver's simple type name to
/// a qualified owner), and the raw source text `tree_sitter::Node::utf8_text`
/// needs to slice.
pub struct ExprContext<'a> {
    pub symbols: &'a SymbolTable,
    pub scope: &'a LocalScope,
    pub file: &'a FileContext,
    pub source: &'a str,
}

impl<'a> ExprContext<'a> {
    #[must_use]
    pub fn new(
        symbols: &'a SymbolTable,
        scope: &'a LocalScope,
        file: &'a FileContext,
        source: &'a str,
    ) -> Self {
        Self {
            symbols,
            scope,
            file,
            source,
        }
    }

    #[must_use]
    pub fn text(&self, node: tree_sitter::Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}
