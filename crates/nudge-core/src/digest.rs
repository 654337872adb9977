//! Content-addressed change detection.
//!
//! Snapshots are never stored verbatim across ticks; they are reduced to
//! a fixed-size digest immediately. This is a change-detector, not a
//! security boundary.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Fixed-size digest of a content snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Digest a snapshot's text.
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Short hex form for status lines.
    pub fn short_hex(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_digest() {
        assert_eq!(ContentDigest::of("hello"), ContentDigest::of("hello"));
    }

    #[test]
    fn different_text_different_digest() {
        assert_ne!(ContentDigest::of("hello"), ContentDigest::of("hello "));
    }

    #[test]
    fn empty_text_is_a_valid_digest() {
        // A failed snapshot degrades to "" — it must still digest cleanly
        // and compare equal to the next failed snapshot.
        assert_eq!(ContentDigest::of(""), ContentDigest::of(""));
    }

    #[test]
    fn short_hex_is_eight_chars() {
        let d = ContentDigest::of("x");
        assert_eq!(d.short_hex().len(), 8);
        assert_eq!(d.to_string(), d.short_hex());
    }
}
