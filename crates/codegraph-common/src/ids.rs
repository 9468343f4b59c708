//! Deterministic entity id hashing.
//!
//! `id = first N hex chars of SHA-256(project_id | language_tag | qualified_name | signature_if_any)`
//!
//! `N` defaults to 16 and is configurable per [`EntityIdHasher`] instance so a
//! caller (e.g. the graph-writer collaborator) can tune id length without
//! touching the hashing algorithm. Same inputs, any insertion order, must
//! yield the same id — the hasher takes no mutable state beyond its `hex_len`.

use sha2::{Digest, Sha256};

use crate::language::LanguageTag;

/// Default hex length for entity ids.
pub const DEFAULT_ID_HEX_LEN: usize = 16;

/// Computes deterministic entity ids from their defining coordinates.
#[derive(Clone, Copy, Debug)]
pub struct EntityIdHasher {
    hex_len: usize,
}

impl Default for EntityIdHasher {
    fn default() -> Self {
        Self {
            hex_len: DEFAULT_ID_HEX_LEN,
        }
    }
}

impl EntityIdHasher {
    #[must_use]
    pub const fn with_hex_len(hex_len: usize) -> Self {
        Self { hex_len }
    }

    /// Hashes a type or module: `project_id | language_tag | qualified_name`.
    #[must_use]
    pub fn type_id(&self, project_id: &str, lang: LanguageTag, qualified_name: &str) -> String {
        self.hash_parts(&[project_id, lang.as_str(), qualified_name])
    }

    /// Hashes a callable: `project_id | language_tag | qualified_name | signature`.
    ///
    /// This is the id a `CALLS` edge must regenerate using the callee's
    /// *declared* signature — never a placeholder — so that the edge target
    /// equals the id produced when the callable was defined.
    #[must_use]
    pub fn callable_id(
        &self,
        project_id: &str,
        lang: LanguageTag,
        qualified_name: &str,
        signature: &str,
    ) -> String {
        self.hash_parts(&[project_id, lang.as_str(), qualified_name, signature])
    }

    fn hash_parts(&self, parts: &[&str]) -> String {
        let mut hasher = Sha256::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();
        let hex = hex_encode(&digest);
        hex[..self.hex_len.min(hex.len())].to_string()
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let hasher = EntityIdHasher::default();
        let a = hasher.type_id("proj", LanguageTag::Java, "com.example.Foo");
        let b = hasher.type_id("proj", LanguageTag::Java, "com.example.Foo");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_ID_HEX_LEN);
    }

    #[test]
    fn different_signature_different_id() {
        let hasher = EntityIdHasher::default();
        let a = hasher.callable_id("proj", LanguageTag::Java, "C.f", "(int)");
        let b = hasher.callable_id("proj", LanguageTag::Java, "C.f", "(String)");
        assert_ne!(a, b);
    }

    #[test]
    fn language_tag_is_part_of_the_hash() {
        let hasher = EntityIdHasher::default();
        let a = hasher.type_id("proj", LanguageTag::Java, "pkg.Foo");
        let b = hasher.type_id("proj", LanguageTag::Go, "pkg.Foo");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_len_is_configurable() {
        let hasher = EntityIdHasher::with_hex_len(8);
        let id = hasher.type_id("proj", LanguageTag::Php, "App\\Foo");
        assert_eq!(id.len(), 8);
    }
}
