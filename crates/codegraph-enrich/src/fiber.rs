//! Fiber routing semantics for Go IR.

use std::path::Path;

use codegraph_adapter::Enricher;
use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;

use crate::go_router::{self, GoRouterConfig};

const FIBER_CONFIG: GoRouterConfig = GoRouterConfig {
    framework: "fiber",
    import_prefixes: &["github.com/gofiber/fiber"],
    path_first_methods: &[
        ("Get", "GET"),
        ("Post", "POST"),
        ("Put", "PUT"),
        ("Patch", "PATCH"),
        ("Delete", "DELETE"),
        ("Options", "OPTIONS"),
        ("Head", "HEAD"),
        ("All", "ANY"),
    ],
    verb_path_methods: &["Add"],
    group_method: "Group",
};

#[derive(Default)]
pub struct FiberEnricher;

impl FiberEnricher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for FiberEnricher {
    fn name(&self) -> &'static str {
        "fiber"
    }

    fn supported_languages(&self) -> &'static [LanguageTag] {
        &[LanguageTag::Go]
    }

    fn enrich(&self, ir: &mut IrRoot, source_root: &Path) -> Result<(), AnalysisError> {
        go_router::enrich(&FIBER_CONFIG, ir, source_root)
    }
}
