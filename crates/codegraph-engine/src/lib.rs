//! Orchestration facade: detects which languages are present in a source
//! tree, runs each language's adapter, merges the resulting IRs, and applies
//! the framework enrichers. This is the only crate in the workspace that
//! knows about every language and every enricher at once; individual
//! adapters and enrichers never depend on each other directly.

mod orchestrator;

pub use orchestrator::{analyze_project, ScanResult};
