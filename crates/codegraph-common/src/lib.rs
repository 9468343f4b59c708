//! Common types and utilities for the codegraph analysis engine.
//!
//! This crate provides foundational types used across every codegraph crate:
//! - The [`LanguageTag`] every IR entity carries
//! - Deterministic entity id hashing ([`EntityIdHasher`])
//! - The [`AnalysisError`] taxonomy for the handful of failures that are not
//!   representable as IR data
//! - Shared limits and defaults

pub mod error;
pub use error::AnalysisError;

pub mod ids;
pub use ids::EntityIdHasher;

pub mod language;
pub use language::LanguageTag;

pub mod limits;
