//! Username/password verification and registration

use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::auth::models::{NewUser, User};
use crate::auth::password::PasswordHasher;
use crate::error::Result;
use crate::store::SharedStore;

/// Verifies credentials and creates users
#[derive(Clone)]
pub struct CredentialService {
    store: SharedStore,
    hasher: Arc<dyn PasswordHasher>,
    /// Verified against on unknown usernames so they cost the same as a
    /// wrong password
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialService {
    pub fn new(store: SharedStore, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Look up `username` and check `password` against its stored hash.
    ///
    /// Unknown users and wrong passwords both yield `Ok(None)`; only storage
    /// or hashing failures are errors.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            tracing::debug!("Login attempt for unknown user");
            let hash = self.dummy_hash().await?;
            self.verify(password, hash).await?;
            return Ok(None);
        };

        if !self.verify(password, user.password_hash.clone()).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Hash `password` and insert a new user.
    ///
    /// A taken username surfaces as `Error::DuplicateKey`.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let password_hash = self.hash(password).await?;

        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Registered user {}", user.username);
        Ok(user)
    }

    async fn hash(&self, password: &str) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    async fn verify(&self, password: &str, hash: String) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await?
    }

    async fn dummy_hash(&self) -> Result<String> {
        self.dummy_hash
            .get_or_try_init(|| self.hash("remixblog-unknown-user"))
            .await
            .cloned()
    }
}
