/// HTTP handlers for board endpoints
///
/// - `posts`: list/create at `/posts`, delete at `/posts/delete`
/// - `util`: logout, not-found, bad-request and health responses
/// - `form`: form field extraction for request bodies
pub mod form;
pub mod posts;
pub mod util;

pub use posts::{handle_delete, handle_list, DELETE_PATH, POSTS_PATH};
pub use util::{handle_bad_request, handle_logout, handle_not_found, health_check};
