//! Gin routing semantics for Go IR.

use std::path::Path;

use codegraph_adapter::Enricher;
use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_ir::IrRoot;

use crate::go_router::{self, GoRouterConfig};

const GIN_CONFIG: GoRouterConfig = GoRouterConfig {
    framework: "gin",
    import_prefixes: &["github.com/gin-gonic/gin"],
    path_first_methods: &[
        ("GET", "GET"),
        ("POST", "POST"),
        ("PUT", "PUT"),
        ("PATCH", "PATCH"),
        ("DELETE", "DELETE"),
        ("OPTIONS", "OPTIONS"),
        ("HEAD", "HEAD"),
        ("Any", "ANY"),
    ],
    verb_path_methods: &["Handle"],
    group_method: "Group",
};

#[derive(Default)]
pub struct GinEnricher;

impl GinEnricher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for GinEnricher {
    fn name(&self) -> &'static str {
        "gin"
    }

    fn supported_languages(&self) -> &'static [LanguageTag] {
        &[LanguageTag::Go]
    }

    fn enrich(&self, ir: &mut IrRoot, source_root: &Path) -> Result<(), AnalysisError> {
        go_router::enrich(&GIN_CONFIG, ir, source_root)
    }
}
