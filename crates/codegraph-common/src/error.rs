//! The handful of truly exceptional failures that are not IR data.
//!
//! Per the error-handling design, unresolved references, ambiguity, and
//! validator errors are always data inside the IR, never exceptions. The
//! errors below only surface from the adapter boundary — a bad root
//! directory, or an unreadable module manifest — before there is any IR to
//! report data in. A single malformed source file never produces one of
//! these; it is logged and skipped.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("source root does not exist or is not a directory: {0}")]
    InvalidSourceRoot(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("go.mod not found or unparsable at {0}")]
    MissingGoModule(PathBuf),
}
