//! Trait contracts shared between the per-language adapter crates and the
//! orchestrator.
//!
//! Lives in its own crate, not `codegraph-engine`, so that
//! `codegraph-lang-{java,go,php}` and `codegraph-enrich` can implement these
//! traits without depending on the engine that in turn depends on them.

use std::path::Path;

use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;
use codegraph_symbols::SymbolTable;

/// One implementation per source language. `analyze` is the two-phase
/// pipeline itself: build the cross-file symbol table, then resolve
/// references against it into an IR.
pub trait LanguageAdapter {
    fn language_tag(&self) -> LanguageTag;

    fn build_symbol_table(&self, source_root: &Path) -> Result<SymbolTable, AnalysisError>;

    fn resolve_references(
        &self,
        source_root: &Path,
        symbols: &SymbolTable,
    ) -> Result<IrRoot, AnalysisError>;

    fn analyze(&self, source_root: &Path) -> Result<IrRoot, AnalysisError> {
        let symbols = self.build_symbol_table(source_root)?;
        self.resolve_references(source_root, &symbols)
    }
}

/// A post-phase pass that attaches framework-level metadata to an IR.
/// Mutates in place; must tolerate unknown annotations and partially
/// resolved IRs, and must be idempotent (running twice is a no-op the
/// second time).
pub trait Enricher {
    fn name(&self) -> &'static str;

    fn supported_languages(&self) -> &'static [LanguageTag];

    fn enrich(&self, ir: &mut IrRoot, source_root: &Path) -> Result<(), AnalysisError>;
}
