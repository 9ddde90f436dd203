/// Post persistence
///
/// `PostStore` is the contract every backend satisfies:
/// - `memory`: transient store for development and tests
/// - `post_repo`: PostgreSQL store
///
/// Every operation is a single atomic step; callers never hold a store
/// transaction across client I/O.
use crate::config::{StoreConfig, StoreKind};
use crate::error::Result;
use crate::models::Post;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

pub mod memory;
pub mod post_repo;

pub use memory::InMemoryPostStore;
pub use post_repo::PgPostStore;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Append a post with a fresh id and the current time
    async fn create(&self, content: &str, posted_by: &str, tracking_cookie: &str) -> Result<Post>;

    /// Snapshot of all posts, newest (highest id) first
    async fn list_all(&self) -> Result<Vec<Post>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Remove a post. Returns `false` when no post has this id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Build the store selected by configuration
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn PostStore>> {
    match config.kind {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory post store; posts are lost on restart");
            Ok(Arc::new(InMemoryPostStore::new()))
        }
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let pool = create_pool(url, config.max_connections)
                .await
                .context("failed to connect to PostgreSQL")?;

            post_repo::MIGRATOR
                .run(&pool)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("Database migrations completed successfully");

            Ok(Arc::new(PgPostStore::new(pool)))
        }
    }
}

/// Create a PostgreSQL connection pool and verify it with a round trip
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> std::result::Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!(max_connections, "Database pool created and verified successfully");

    Ok(pool)
}
