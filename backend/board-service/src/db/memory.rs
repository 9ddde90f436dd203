use super::PostStore;
use crate::error::Result;
use crate::models::Post;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct State {
    next_id: i64,
    posts: BTreeMap<i64, Post>,
}

/// Transient post store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryPostStore {
    state: RwLock<State>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                posts: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, content: &str, posted_by: &str, tracking_cookie: &str) -> Result<Post> {
        let mut state = self.state.write().await;

        let id = state.next_id;
        state.next_id += 1;

        let post = Post {
            id,
            content: content.to_string(),
            posted_by: posted_by.to_string(),
            tracking_cookie: tracking_cookie.to_string(),
            created_at: Utc::now(),
        };
        state.posts.insert(id, post.clone());

        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.posts.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_increase_monotonically() {
        let store = InMemoryPostStore::new();
        let first = store.create("one", "alice", "t").await.unwrap();
        let second = store.create("two", "alice", "t").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = InMemoryPostStore::new();
        let p1 = store.create("p1", "alice", "t").await.unwrap();
        let p2 = store.create("p2", "bob", "t").await.unwrap();
        let p3 = store.create("p3", "alice", "t").await.unwrap();

        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![p3.id, p2.id, p1.id]);
    }

    #[tokio::test]
    async fn test_create_accepts_empty_content() {
        let store = InMemoryPostStore::new();
        let post = store.create("", "alice", "1_abc").await.unwrap();

        assert_eq!(post.content, "");
        assert_eq!(post.tracking_cookie, "1_abc");
        assert_eq!(store.find_by_id(post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let store = InMemoryPostStore::new();
        let keep = store.create("keep", "alice", "t").await.unwrap();
        let drop = store.create("drop", "alice", "t").await.unwrap();

        assert!(store.delete(drop.id).await.unwrap());
        assert!(!store.delete(drop.id).await.unwrap());

        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining, vec![keep]);
        assert!(store.find_by_id(drop.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryPostStore::new();
        let first = store.create("one", "alice", "t").await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create("two", "alice", "t").await.unwrap();
        assert!(second.id > first.id);
    }
}
