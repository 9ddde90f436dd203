//! Tracking tokens
//!
//! A tracking token is `originalId_digest`, where `originalId` is a random
//! decimal integer and `digest` binds it to the user name of the request that
//! carries it. Tokens are pseudonymous: they correlate requests of the same
//! user without being a credential.
//!
//! ```text
//! cookie tracking_id ──► split at first '_' ──► verify(originalId, user, digest)
//!                                                   │ ok            │ mismatch / missing
//!                                                   ▼               ▼
//!                                               reuse as-is     issue new, expires in 24h
//! ```

use crate::hash::{DigestEngine, DigestError};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};

/// Cookie that carries the tracking token.
pub const TRACKING_COOKIE_NAME: &str = "tracking_id";

/// Separator between the original identifier and its digest.
pub const TOKEN_SEPARATOR: char = '_';

/// Largest integer a double can represent exactly (2^53 - 1).
pub const MAX_ORIGINAL_ID: u64 = (1 << 53) - 1;

/// Lifetime of a freshly issued tracking cookie.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Outcome of [`TrackingTokenManager::ensure_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingToken {
    /// Token value to use for this request
    pub value: String,
    /// True when the token was issued for this request and must be written back
    pub is_fresh: bool,
    /// Cookie expiration, only set for fresh tokens
    pub expires_at: Option<DateTime<Utc>>,
}

/// Issues and validates tracking tokens with an injected secret.
#[derive(Debug, Clone)]
pub struct TrackingTokenManager {
    engine: DigestEngine,
}

impl TrackingTokenManager {
    pub fn new(secret_key: &[u8]) -> Result<Self, DigestError> {
        Ok(Self::from_engine(DigestEngine::new(secret_key)?))
    }

    pub fn from_engine(engine: DigestEngine) -> Self {
        Self { engine }
    }

    /// Reuse `incoming` if it is valid for `user_name`, otherwise issue a new token.
    ///
    /// A valid token is returned byte-for-byte and without an expiration, so
    /// the caller must not refresh the cookie.
    pub fn ensure_token(&self, incoming: Option<&str>, user_name: &str) -> TrackingToken {
        match incoming {
            Some(token) if self.validate(token, user_name) => TrackingToken {
                value: token.to_string(),
                is_fresh: false,
                expires_at: None,
            },
            Some(_) => {
                tracing::debug!(user = %user_name, "tracking token rejected, reissuing");
                self.issue(user_name)
            }
            None => {
                tracing::debug!(user = %user_name, "no tracking token, issuing");
                self.issue(user_name)
            }
        }
    }

    /// True iff the digest part of `token` matches its identifier for `user_name`.
    pub fn validate(&self, token: &str, user_name: &str) -> bool {
        match split_token(token) {
            Some((original_id, digest)) => self.engine.verify(original_id, user_name, digest),
            None => false,
        }
    }

    /// Issue a new token for `user_name`, expiring 24 hours from now.
    pub fn issue(&self, user_name: &str) -> TrackingToken {
        let original_id = OsRng.gen_range(0..=MAX_ORIGINAL_ID);
        self.issue_with(original_id, user_name, Utc::now())
    }

    fn issue_with(&self, original_id: u64, user_name: &str, now: DateTime<Utc>) -> TrackingToken {
        let original_id = original_id.to_string();
        let digest = self.engine.digest(&original_id, user_name);

        TrackingToken {
            value: format!("{original_id}{TOKEN_SEPARATOR}{digest}"),
            is_fresh: true,
            expires_at: Some(now + Duration::hours(TOKEN_LIFETIME_HOURS)),
        }
    }
}

/// Split a token at the first separator into `(original_id, digest)`.
pub fn split_token(token: &str) -> Option<(&str, &str)> {
    token.split_once(TOKEN_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::DIGEST_HEX_LEN;

    fn manager() -> TrackingTokenManager {
        TrackingTokenManager::new(b"tracking-test-secret").unwrap()
    }

    #[test]
    fn test_issue_with_is_well_formed() {
        let now = Utc::now();
        let token = manager().issue_with(9_007_199_254_740_991, "alice", now);

        let (id, digest) = split_token(&token.value).unwrap();
        assert_eq!(id, "9007199254740991");
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(token.is_fresh);
        assert_eq!(token.expires_at, Some(now + Duration::hours(24)));
    }

    #[test]
    fn test_issue_stays_within_safe_integer_range() {
        let manager = manager();
        for _ in 0..64 {
            let token = manager.issue("alice");
            let (id, _) = split_token(&token.value).unwrap();
            let id: u64 = id.parse().unwrap();
            assert!(id <= MAX_ORIGINAL_ID);
        }
    }

    #[test]
    fn test_split_uses_first_separator() {
        assert_eq!(split_token("12_ab_cd"), Some(("12", "ab_cd")));
        assert_eq!(split_token("no-separator"), None);
        assert_eq!(split_token("_abc"), Some(("", "abc")));
    }

    #[test]
    fn test_valid_token_is_reused() {
        let manager = manager();
        let issued = manager.issue("alice");

        let resolved = manager.ensure_token(Some(&issued.value), "alice");
        assert_eq!(resolved.value, issued.value);
        assert!(!resolved.is_fresh);
        assert!(resolved.expires_at.is_none());
    }

    #[test]
    fn test_missing_token_is_issued() {
        let resolved = manager().ensure_token(None, "alice");
        assert!(resolved.is_fresh);
        assert!(resolved.expires_at.is_some());
    }

    #[test]
    fn test_token_without_separator_is_reissued() {
        let resolved = manager().ensure_token(Some("garbage"), "alice");
        assert!(resolved.is_fresh);
        assert_ne!(resolved.value, "garbage");
    }

    #[test]
    fn test_token_for_other_user_is_reissued() {
        let manager = manager();
        let alice = manager.issue("alice");

        let resolved = manager.ensure_token(Some(&alice.value), "bob");
        assert!(resolved.is_fresh);
        assert_ne!(resolved.value, alice.value);
        assert!(manager.validate(&resolved.value, "bob"));
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let foreign = TrackingTokenManager::new(b"some-other-secret").unwrap();
        let token = foreign.issue("alice");
        assert!(!manager().validate(&token.value, "alice"));
    }
}
