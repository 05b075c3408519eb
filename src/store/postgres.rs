//! PostgreSQL data store

use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use super::{PostStore, UserStore};
use crate::auth::{NewUser, User};
use crate::error::{Error, Result};
use crate::posts::{NewPost, Post};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at DESC);
"#;

/// Store backed by a single PostgreSQL connection
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Connect using a libpq-style connection string or URL
    pub async fn connect(url: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Create tables if they do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        self.client.batch_execute(SCHEMA).await?;
        tracing::debug!("Database schema is up to date");
        Ok(())
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

fn post_from_row(row: &Row) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_insert_error(err: tokio_postgres::Error, what: String) -> Error {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        Error::DuplicateKey(what)
    } else {
        Error::Database(err)
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
                &[&id],
            )
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let user = User::new(user.username, user.password_hash);
        self.client
            .execute(
                "INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)",
                &[&user.id, &user.username, &user.password_hash, &user.created_at],
            )
            .await
            .map_err(|e| map_insert_error(e, format!("username '{}'", user.username)))?;
        Ok(user)
    }
}

#[async_trait]
impl PostStore for PostgresStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = self
            .client
            .query(
                "SELECT id, title, body, user_id, created_at, updated_at FROM posts ORDER BY created_at DESC",
                &[],
            )
            .await?;
        rows.iter().map(post_from_row).collect()
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, body, user_id, created_at, updated_at FROM posts WHERE id = $1",
                &[&id],
            )
            .await?;
        row.as_ref().map(post_from_row).transpose()
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let post = Post::from_new(post);
        self.client
            .execute(
                "INSERT INTO posts (id, title, body, user_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &post.id,
                    &post.title,
                    &post.body,
                    &post.user_id,
                    &post.created_at,
                    &post.updated_at,
                ],
            )
            .await
            .map_err(|e| map_insert_error(e, format!("post '{}'", post.id)))?;
        Ok(post)
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        let deleted = self
            .client
            .execute("DELETE FROM posts WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }
}
