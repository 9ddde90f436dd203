//! # Actix Middleware Library
//!
//! Authentication gate for the message board.
//!
//! ## Modules
//! - `basic_auth`: Basic authentication middleware and `AuthenticatedUser` extractor
//! - `credentials`: Argon2 credential file loading and verification

pub mod basic_auth;
pub mod credentials;

pub use basic_auth::{AuthError, AuthenticatedUser, BasicAuthMiddleware};
pub use credentials::{hash_password, CredentialError, CredentialStore};
