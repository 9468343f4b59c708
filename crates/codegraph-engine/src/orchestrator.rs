//! Detects which languages are present under a source root, runs each
//! language's adapter, merges the resulting IRs, and applies every framework
//! enricher whose supported language was actually detected.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use codegraph_adapter::{Enricher, LanguageAdapter};
use codegraph_common::error::AnalysisError;
use codegraph_common::language::LanguageTag;
use codegraph_common::limits::SKIPPED_DIRECTORY_NAMES;
use codegraph_ir::{merge_all, IrRoot};
use codegraph_lang_go::GoAdapter;
use codegraph_lang_java::JavaAdapter;
use codegraph_lang_php::PhpAdapter;

/// Outcome of analyzing a source tree end to end.
///
/// A language or enricher failure is recorded in `errors` rather than
/// aborting the whole scan — one broken `go.mod` should not prevent the
/// Java half of a polyglot repository from being analyzed.
#[derive(Debug)]
pub struct ScanResult {
    pub ir: IrRoot,
    pub languages_scanned: Vec<LanguageTag>,
    pub modules_count: usize,
    pub types_count: usize,
    pub callables_count: usize,
    pub unresolved_count: usize,
    pub errors: Vec<String>,
}

const KNOWN_EXTENSIONS: &[(&str, LanguageTag)] =
    &[("java", LanguageTag::Java), ("go", LanguageTag::Go), ("php", LanguageTag::Php)];

pub fn analyze_project(project_id: &str, source_root: &Path) -> Result<ScanResult, AnalysisError> {
    if !source_root.is_dir() {
        return Err(AnalysisError::InvalidSourceRoot(source_root.to_path_buf()));
    }

    let detected = detect_languages(source_root);
    let mut errors = Vec::new();
    let mut languages_scanned = Vec::new();
    let mut irs = Vec::new();

    for language in &detected {
        let adapter: Box<dyn LanguageAdapter> = match language {
            LanguageTag::Java => Box::new(JavaAdapter::new(project_id)),
            LanguageTag::Go => Box::new(GoAdapter::new(project_id)),
            LanguageTag::Php => Box::new(PhpAdapter::new(project_id)),
        };

        let span = tracing::info_span!("scan_language", language = %language);
        let _enter = span.enter();
        match adapter.analyze(source_root) {
            Ok(ir) => {
                languages_scanned.push(*language);
                irs.push(ir);
            }
            Err(err) => {
                warn!(%language, error = %err, "language adapter failed, skipping");
                errors.push(format!("{language}: {err}"));
            }
        }
    }

    let mut ir = merge_all(irs);

    {
        let span = tracing::info_span!("enrich");
        let _enter = span.enter();
        for enricher in codegraph_enrich::default_enrichers() {
            if !enricher.supported_languages().iter().any(|l| detected.contains(l)) {
                continue;
            }
            if let Err(err) = enricher.enrich(&mut ir, source_root) {
                warn!(enricher = %enricher.name(), error = %err, "enricher failed, skipping");
                errors.push(format!("{}: {err}", enricher.name()));
            }
        }
    }

    Ok(ScanResult {
        modules_count: ir.modules.len(),
        types_count: ir.types.len(),
        callables_count: ir.callables.len(),
        unresolved_count: ir.unresolved_references.len(),
        ir,
        languages_scanned,
        errors,
    })
}

/// Single directory walk collecting which of the three known source
/// extensions are present, skipping the usual filesystem noise. Stops early
/// once every known language has been seen.
fn detect_languages(source_root: &Path) -> Vec<LanguageTag> {
    let mut found: BTreeSet<LanguageTag> = BTreeSet::new();

    for entry in WalkDir::new(source_root)
        .into_iter()
        .filter_entry(|e| {
            e.file_type().is_file() || !SKIPPED_DIRECTORY_NAMES.contains(&e.file_name().to_string_lossy().as_ref())
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else { continue };
        if let Some((_, lang)) = KNOWN_EXTENSIONS.iter().find(|(known, _)| *known == ext) {
            found.insert(*lang);
        }
        if found.len() == KNOWN_EXTENSIONS.len() {
            break;
        }
    }

    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_root_detects_nothing_and_errors_on_missing_path() {
        let missing = Path::new("/nonexistent/path/for/codegraph-engine-tests");
        let result = analyze_project("proj", missing);
        assert!(matches!(result, Err(AnalysisError::InvalidSourceRoot(_))));
    }

    #[test]
    fn empty_but_existing_directory_produces_empty_ir() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyze_project("proj", dir.path()).unwrap();
        assert!(result.languages_scanned.is_empty());
        assert_eq!(result.types_count, 0);
        assert!(result.errors.is_empty());
    }
}
