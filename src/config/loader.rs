//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Config, Environment};

const CONFIG_FILENAME: &str = "remixblog.toml";

/// Load configuration from remixblog.toml, falling back to built-in defaults
///
/// The result is validated: a missing session secret is an error here so the
/// server never starts without one.
pub fn load_config() -> Result<Config> {
    match find_config_file() {
        Some(path) => load_config_from_path(&path),
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            load_config_from_str(default_config_content())
        }
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    tracing::debug!("Loading config from {}", path.display());
    load_config_from_str(&content)
}

/// Parse, apply environment overrides and validate configuration text
pub fn load_config_from_str(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let mut config: Config = toml::from_str(&content)?;
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Option<PathBuf> {
    let mut current = env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(value) = env::var("APP_ENV") {
        if !value.trim().is_empty() {
            config.server.environment = value.parse::<Environment>().map_err(Error::Config)?;
        }
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    if config.session.secret.trim().is_empty() {
        return Err(Error::MissingSessionSecret);
    }

    if config.session.max_age_secs <= 0 {
        return Err(Error::Config(
            "session.max_age_secs must be positive".to_string(),
        ));
    }

    if !(4..=31).contains(&config.auth.bcrypt_cost) {
        return Err(Error::Config(format!(
            "auth.bcrypt_cost must be between 4 and 31, got {}",
            config.auth.bcrypt_cost
        )));
    }

    Ok(())
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# remixblog configuration

[server]
host = "0.0.0.0"
port = 3000
# "production" adds the Secure attribute to the session cookie.
# APP_ENV overrides this value.
environment = "development"

[session]
# Required. The server refuses to start without a signing secret.
secret = "${SESSION_SECRET}"
# Secrets listed here are still accepted when verifying existing cookies.
# previous_secrets = ["old-secret"]
cookie_name = "remixblog_session"
max_age_secs = 5184000  # 60 days

[auth]
bcrypt_cost = 10

[database]
# Leave empty to keep everything in memory.
url = "${DATABASE_URL:-}"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("REMIXBLOG_TEST_VAR", "hello");
        let content = "value = \"${REMIXBLOG_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("REMIXBLOG_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let content = r#"
[session]
secret = ""
"#;
        let result = load_config_from_str(content);
        assert!(matches!(result, Err(Error::MissingSessionSecret)));
    }

    #[test]
    fn test_explicit_secret_and_defaults() {
        let content = r#"
[session]
secret = "s3cr3t"
"#;
        let config = load_config_from_str(content).expect("config should load");
        assert_eq!(config.session.secret, "s3cr3t");
        assert_eq!(config.session.cookie_name, "remixblog_session");
        assert_eq!(config.session.max_age_secs, 5_184_000);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.server.port, 3000);
        assert!(config.database.postgres_url().is_none());
    }

    #[test]
    fn test_bcrypt_cost_out_of_range() {
        let content = r#"
[session]
secret = "s3cr3t"

[auth]
bcrypt_cost = 2
"#;
        assert!(matches!(
            load_config_from_str(content),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_default_content_parses() {
        let content = default_config_content().replace("${SESSION_SECRET}", "from-test");
        let config = load_config_from_str(&content).expect("default config should load");
        assert_eq!(config.session.secret, "from-test");
    }
}
