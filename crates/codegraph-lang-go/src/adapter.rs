//! [`GoAdapter`]: the `LanguageAdapter` implementation wiring the scanner and
//! resolver together for Go source trees.
//!
//! The signature builder strips a leading `*` from pointer parameter types
//! (`*User` becomes `User`), conflating value and pointer receivers at the
//! signature level. This can mask genuine overload distinctions and is a
//! deliberate, known limitation rather than a bug to fix silently.

use std::path::Path;

use codegraph_adapter::LanguageAdapter;
use codegraph_common::error::AnalysisError;
use codegraph_common::ids::EntityIdHasher;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;
use codegraph_symbols::SymbolTable;

use crate::{resolver, scanner};

pub struct GoAdapter {
    project_id: String,
    id_hasher: EntityIdHasher,
}

impl GoAdapter {
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            id_hasher: EntityIdHasher::default(),
        }
    }

    #[must_use]
    pub fn with_id_hasher(mut self, hasher: EntityIdHasher) -> Self {
        self.id_hasher = hasher;
        self
    }
}

impl LanguageAdapter for GoAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::Go
    }

    fn build_symbol_table(&self, source_root: &Path) -> Result<SymbolTable, AnalysisError> {
        scanner::build_symbol_table(source_root)
    }

    fn resolve_references(
        &self,
        source_root: &Path,
        symbols: &SymbolTable,
    ) -> Result<IrRoot, AnalysisError> {
        resolver::resolve_references(source_root, symbols, &self.project_id, self.id_hasher)
    }
}
