//! In-memory data store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{PostStore, UserStore};
use crate::auth::{NewUser, User};
use crate::error::{Error, Result};
use crate::posts::{NewPost, Post};

/// Store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    posts: Arc<RwLock<HashMap<String, Post>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user and their posts
    pub async fn remove_user(&self, id: &str) -> bool {
        let removed = self.users.write().await.remove(id).is_some();
        if removed {
            self.posts.write().await.retain(|_, post| post.user_id != id);
        }
        removed
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            posts: Arc::clone(&self.posts),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        // Check and insert under one write lock so concurrent registrations
        // of the same name cannot both succeed
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(Error::DuplicateKey(format!("username '{}'", user.username)));
        }

        let user = User::new(user.username, user.password_hash);
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let post = Post::from_new(post);
        self.posts
            .write()
            .await
            .insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        Ok(self.posts.write().await.remove(id).is_some())
    }
}
