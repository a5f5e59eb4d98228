//! Content identity resolver.
//!
//! Fingerprints and card identities are built on 64-bit FNV-1a over UTF-8
//! bytes. The hash is not a security boundary, only a matching key, but it must
//! stay byte-for-byte stable across releases and platforms: changing it orphans
//! every stored progress row.

use crate::models::{CardIdentity, ContentFingerprint};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Streaming 64-bit FNV-1a hasher
#[derive(Debug, Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    /// Absorbs a length-prefixed string so adjacent texts cannot run together
    fn write_text(&mut self, text: &str) {
        self.write(&(text.len() as u64).to_le_bytes());
        self.write(text.as_bytes());
    }

    fn finish_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

/// Computes the fingerprint of a deck from its front texts in deck order
///
/// Sensitive to order, count and exact wording.
pub fn fingerprint<S: AsRef<str>>(front_texts: &[S]) -> ContentFingerprint {
    let mut hasher = Fnv1a64::new();
    for front in front_texts {
        hasher.write_text(front.as_ref());
    }
    ContentFingerprint::new(hasher.finish_hex())
}

/// Derives the identity of the card at `ordinal` with the given front text
pub fn card_identity(front_text: &str, ordinal: usize) -> CardIdentity {
    let mut hasher = Fnv1a64::new();
    hasher.write(front_text.as_bytes());
    CardIdentity::new(format!("{}-{}", ordinal, hasher.finish_hex()))
}
