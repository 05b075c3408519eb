//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration for the HTTP frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment; `APP_ENV` overrides it at load time
    #[serde(default)]
    pub environment: Environment,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Session cookie settings as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_secret")]
    pub secret: String,

    /// Older secrets still accepted when verifying cookies
    #[serde(default)]
    pub previous_secrets: Vec<String>,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: i64,
}

fn default_session_secret() -> String {
    std::env::var("SESSION_SECRET").unwrap_or_default()
}

fn default_cookie_name() -> String {
    "remixblog_session".to_string()
}

fn default_max_age_secs() -> i64 {
    60 * 60 * 24 * 60
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret: default_session_secret(),
            previous_secrets: Vec::new(),
            cookie_name: default_cookie_name(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

/// Credential hashing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// Data store selection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Postgres connection string; empty means the in-memory store
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseConfig {
    pub fn postgres_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}
