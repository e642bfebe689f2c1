// src/core/ident.rs
// Identity assignment for scraped records: deterministic when a seed exists
// (same seed ⇒ same id across runs), random otherwise.

use rand::Rng;

use crate::core::sanitize::normalize_ws;

/// URL-safe alphabet for random nonces.
const NONCE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";
const NONCE_LEN: usize = 21;

/// How an id came to be. Only the derived variant is reproducible across runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Derived(String),
    Random(String),
}

impl Identity {
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Derived(s) | Identity::Random(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Identity::Derived(s) | Identity::Random(s) => s,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Identity::Derived(_))
    }
}

/// Derive a stable id from `seed` when it has any visible content; otherwise
/// hand out a fresh random nonce. Always succeeds.
pub fn assign_identity(seed: Option<&str>) -> Identity {
    let cleaned = normalize_ws(seed.unwrap_or(""));
    if cleaned.is_empty() {
        Identity::Random(random_nonce())
    } else {
        Identity::Derived(hash_seed(&cleaned))
    }
}

/// Order-sensitive 32-bit string hash over UTF-16 code units:
/// `h = (h << 5) - h + unit`, wrapping on overflow. Namespaced with `id_`.
pub fn hash_seed(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    format!("id_{}", (hash as i64).abs())
}

fn random_nonce() -> String {
    let mut rng = rand::rng();
    (0..NONCE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..NONCE_ALPHABET.len());
            NONCE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_is_deterministic() {
        let a = assign_identity(Some("/lead/lead_abc123"));
        let b = assign_identity(Some("  /lead/lead_abc123 "));
        assert!(a.is_derived());
        assert_eq!(a, b);
    }

    #[test]
    fn derived_is_order_sensitive() {
        assert_ne!(hash_seed("ab"), hash_seed("ba"));
    }

    #[test]
    fn empty_seed_goes_random() {
        let a = assign_identity(None);
        let b = assign_identity(Some("   "));
        assert!(!a.is_derived());
        assert!(!b.is_derived());
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), NONCE_LEN);
    }

    #[test]
    fn hash_wraps_instead_of_overflowing() {
        // Long input forces repeated i32 overflow; must not panic.
        let long = "x".repeat(10_000);
        let id = hash_seed(&long);
        assert!(id.starts_with("id_"));
    }

    #[test]
    fn hash_is_prefixed_and_non_negative() {
        for s in ["a", "Jane Doe-Acme", "täsk", "task--0"] {
            let id = hash_seed(s);
            assert!(id.starts_with("id_"));
            assert!(!id.contains('-'));
        }
    }
}
