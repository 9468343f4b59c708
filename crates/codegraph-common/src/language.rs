//! The language tag every IR entity carries.

use serde::{Deserialize, Serialize};

/// The source language an entity was scanned from.
///
/// Every IR entity carries its own tag, assigned once at scan time. Merging
/// IRs from different languages must never rewrite an entity's own tag —
/// only the aggregate tag on `IrRoot` is informational and may be ambiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageTag {
    Java,
    Go,
    Php,
}

impl LanguageTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Go => "go",
            Self::Php => "php",
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
