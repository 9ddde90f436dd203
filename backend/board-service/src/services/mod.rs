/// Business logic layer for board-service
pub mod posts;

pub use posts::{DeleteOutcome, PostService};
