/// HTTP middleware and authorization for board-service
///
/// - Basic-auth gate and `AuthenticatedUser` come from the shared `actix-middleware` crate
/// - `permissions`: ownership rule for deleting posts
pub mod permissions;

pub use actix_middleware::{AuthenticatedUser, BasicAuthMiddleware, CredentialStore};
pub use permissions::can_delete_post;
