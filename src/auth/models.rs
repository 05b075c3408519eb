//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered user
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Username for login
    pub username: String,
    /// bcrypt hash of the password, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user record with a fresh identifier
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash,
            created_at: chrono::Utc::now(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Data needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Which action the login form asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    Login,
    Register,
}

impl fmt::Display for LoginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginType::Login => write!(f, "login"),
            LoginType::Register => write!(f, "register"),
        }
    }
}

impl std::str::FromStr for LoginType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "login" => Ok(LoginType::Login),
            "register" => Ok(LoginType::Register),
            _ => Err(()),
        }
    }
}

/// Login form submission. Every field is optional so that a missing input
/// becomes a field error instead of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "loginType")]
    pub login_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// User information in responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
