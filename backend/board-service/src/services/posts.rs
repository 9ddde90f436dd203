/// Post service - creation, listing and authorized deletion
use crate::db::PostStore;
use crate::error::Result;
use crate::middleware::can_delete_post;
use crate::models::Post;
use std::sync::Arc;

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// No post with this id (or it vanished between lookup and delete)
    NotFound,
    /// Requester is neither the author nor the administrator
    Forbidden,
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.store.list_all().await
    }

    /// Create a post owned by `user`, tagged with the request's tracking token
    pub async fn create_post(
        &self,
        content: &str,
        user: &str,
        tracking_token: &str,
    ) -> Result<Post> {
        let post = self.store.create(content, user, tracking_token).await?;

        tracing::info!(
            post_id = post.id,
            user = %user,
            tracking_id = %tracking_token,
            "post created"
        );

        Ok(post)
    }

    /// Delete a post if `user` is its author or the administrator
    pub async fn delete_post(&self, post_id: i64, user: &str) -> Result<DeleteOutcome> {
        let Some(post) = self.store.find_by_id(post_id).await? else {
            tracing::info!(post_id, user = %user, "delete requested for unknown post");
            return Ok(DeleteOutcome::NotFound);
        };

        if !can_delete_post(user, &post) {
            tracing::warn!(
                post_id,
                user = %user,
                posted_by = %post.posted_by,
                "unauthorized delete attempt ignored"
            );
            return Ok(DeleteOutcome::Forbidden);
        }

        if self.store.delete(post_id).await? {
            tracing::info!(post_id, user = %user, "post deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryPostStore;

    fn service() -> PostService {
        PostService::new(Arc::new(InMemoryPostStore::new()))
    }

    #[tokio::test]
    async fn test_create_records_owner_and_token() {
        let service = service();
        let post = service.create_post("hello+world", "alice", "5_abc").await.unwrap();

        assert_eq!(post.posted_by, "alice");
        assert_eq!(post.tracking_cookie, "5_abc");
        assert_eq!(post.content, "hello+world");
    }

    #[tokio::test]
    async fn test_author_deletes_own_post() {
        let service = service();
        let keep = service.create_post("keep", "alice", "t").await.unwrap();
        let target = service.create_post("target", "alice", "t").await.unwrap();

        let outcome = service.delete_post(target.id, "alice").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        let remaining = service.list_posts().await.unwrap();
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn test_other_user_cannot_delete() {
        let service = service();
        let post = service.create_post("mine", "alice", "t").await.unwrap();

        let outcome = service.delete_post(post.id, "bob").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Forbidden);
        assert_eq!(service.list_posts().await.unwrap(), vec![post]);
    }

    #[tokio::test]
    async fn test_admin_deletes_any_post() {
        let service = service();
        let post = service.create_post("mine", "alice", "t").await.unwrap();

        let outcome = service.delete_post(post.id, "admin").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(service.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let outcome = service().delete_post(99, "admin").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }
}
