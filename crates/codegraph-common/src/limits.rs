//! Centralized constants and thresholds.
//!
//! Kept as a single small module (rather than scattered magic numbers)
//! mirroring the teacher workspace's `limits.rs` convention, scaled down to
//! what this engine actually needs.

/// Upper bound on recursion depth while inferring chained Go selector
/// expressions. The cycle guard in `codegraph-infer` should make this
/// unreachable in well-formed trees; it exists as a hard backstop against
/// pathological or adversarial input.
pub const MAX_CHAINED_CALL_DEPTH: usize = 256;

/// Directory names skipped during source-tree traversal regardless of
/// language, purely to avoid descending into filesystem noise. This is not
/// part of any language's own filtering rule (those are specified per
/// adapter) — it is a hygiene guard so a `.git` or `node_modules` directory
/// never reaches a scanner.
pub const SKIPPED_DIRECTORY_NAMES: &[&str] = &[".git", "node_modules", "target", "vendor"];
