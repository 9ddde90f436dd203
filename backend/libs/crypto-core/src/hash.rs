//! Keyed digest used to bind tracking identifiers to user names.
//!
//! The digest is HMAC-SHA256 over `original_id ":" user_name`, hex encoded.
//! Generated identifiers are decimal integers, so the `:` separator can never
//! appear inside `original_id` and the encoding stays unambiguous.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("digest key must not be empty")]
    EmptyKey,
    #[error("invalid digest key: {0}")]
    InvalidKey(String),
}

/// Deterministic keyed digest over an identifier and a user name.
///
/// The key is fixed for the lifetime of the engine. Cloning is cheap enough to
/// do per request; the keyed HMAC state is cloned instead of re-keyed.
#[derive(Clone)]
pub struct DigestEngine {
    mac: HmacSha256,
}

impl DigestEngine {
    pub fn new(secret_key: &[u8]) -> Result<Self, DigestError> {
        if secret_key.is_empty() {
            return Err(DigestError::EmptyKey);
        }

        let mac = HmacSha256::new_from_slice(secret_key)
            .map_err(|e| DigestError::InvalidKey(e.to_string()))?;

        Ok(Self { mac })
    }

    /// Compute the lowercase hex digest of `(original_id, user_name)`.
    pub fn digest(&self, original_id: &str, user_name: &str) -> String {
        let mac = self.keyed(original_id, user_name);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check `digest_hex` against a fresh computation, in constant time.
    ///
    /// Only the exact lowercase form produced by [`DigestEngine::digest`] is
    /// accepted.
    pub fn verify(&self, original_id: &str, user_name: &str, digest_hex: &str) -> bool {
        if digest_hex.len() != DIGEST_HEX_LEN
            || !digest_hex
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return false;
        }

        let Ok(expected) = hex::decode(digest_hex) else {
            return false;
        };

        self.keyed(original_id, user_name)
            .verify_slice(&expected)
            .is_ok()
    }

    fn keyed(&self, original_id: &str, user_name: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(original_id.as_bytes());
        mac.update(b":");
        mac.update(user_name.as_bytes());
        mac
    }
}

impl fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestEngine").finish_non_exhaustive()
    }
}
