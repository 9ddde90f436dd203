/// Authorization rules for board-service
///
/// A post may be deleted by its author or by the administrator.
use crate::models::Post;

/// Identity allowed to delete any post
pub const ADMIN_USER: &str = "admin";

/// Check if `user` may delete `post`
pub fn can_delete_post(user: &str, post: &Post) -> bool {
    post.posted_by == user || user == ADMIN_USER
}
