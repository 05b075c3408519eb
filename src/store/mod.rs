//! Data store for users and posts
//!
//! Handlers only see the [`Store`] trait object. [`MemoryStore`] backs
//! development and tests, [`PostgresStore`] backs deployments with a
//! `DATABASE_URL`.

mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::{NewUser, User};
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::posts::{NewPost, Post};

/// Unique-key user lookups and inserts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Fails with `Error::DuplicateKey` when the username is taken
    async fn insert_user(&self, user: NewUser) -> Result<User>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn find_post(&self, id: &str) -> Result<Option<Post>>;

    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    /// Returns false when no post had that id
    async fn delete_post(&self, id: &str) -> Result<bool>;
}

pub trait Store: UserStore + PostStore {}

impl<T: UserStore + PostStore> Store for T {}

pub type SharedStore = Arc<dyn Store>;

/// Open the store selected by the database config
pub async fn connect(config: &DatabaseConfig) -> Result<SharedStore> {
    match config.postgres_url() {
        Some(url) => {
            let store = PostgresStore::connect(url).await?;
            store.migrate().await?;
            tracing::info!("Using PostgreSQL data store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No database configured, data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
