//! Shared cryptographic helpers for the message board.
//!
//! - `hash`: keyed digest engine (HMAC-SHA256)
//! - `tracking`: tracking token issuance and validation

pub mod hash;
pub mod tracking;

pub use hash::{DigestEngine, DigestError};
pub use tracking::{TrackingToken, TrackingTokenManager, TRACKING_COOKIE_NAME};
