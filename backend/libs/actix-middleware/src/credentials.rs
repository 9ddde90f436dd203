//! Credential file for the Basic-auth gate.
//!
//! One entry per line, `user:hash`, where `hash` is an Argon2 PHC string.
//! Blank lines and lines starting with `#` are ignored.

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read credentials file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed credentials entry on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Known users and their password hashes.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a credentials file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, CredentialError> {
        let mut store = Self::new();

        for (index, raw) in contents.lines().enumerate() {
            let line = index + 1;
            let entry = raw.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }

            let (user, hash) = entry.split_once(':').ok_or_else(|| CredentialError::Malformed {
                line,
                reason: "expected user:hash".to_string(),
            })?;

            if store.entries.contains_key(user) {
                return Err(CredentialError::Malformed {
                    line,
                    reason: format!("duplicate user '{}'", user),
                });
            }

            store
                .insert_hash(user, hash)
                .map_err(|e| CredentialError::Malformed {
                    line,
                    reason: e.to_string(),
                })?;
        }

        Ok(store)
    }

    /// Register a user with an existing PHC hash.
    pub fn insert_hash(&mut self, user: &str, hash: &str) -> Result<(), CredentialError> {
        if user.is_empty() {
            return Err(CredentialError::Hash("user name must not be empty".to_string()));
        }
        PasswordHash::new(hash).map_err(|e| CredentialError::Hash(e.to_string()))?;

        self.entries.insert(user.to_string(), hash.to_string());
        Ok(())
    }

    /// Register a user by hashing `password`.
    pub fn insert_password(&mut self, user: &str, password: &str) -> Result<(), CredentialError> {
        let hash = hash_password(password)?;
        self.insert_hash(user, &hash)
    }

    /// Check a user/password pair. Unknown users never verify.
    pub fn verify(&self, user: &str, password: &str) -> bool {
        let Some(hash) = self.entries.get(user) else {
            return false;
        };

        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!(user = %user, error = %e, "stored password hash is invalid");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash a password with Argon2id default parameters.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}
