//! Cookie session management
//!
//! The whole session lives in a signed cookie; the server keeps no session
//! table. The cookie value is an HS256 token whose payload carries the user
//! id plus `iat`/`exp`, so an expired or tampered cookie fails verification
//! and resolves to an empty session.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::models::User;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::UserStore;

/// Where `logout` sends the browser
pub const LOGOUT_REDIRECT: &str = "/auth/logout";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie policy and signing secrets, fixed at startup
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Signing secret for new cookies
    pub secret: String,
    /// Secrets still accepted when verifying cookies
    pub previous_secrets: Vec<String>,
    pub cookie_name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: i64,
}

impl SessionConfig {
    /// Cookie policy with defaults around the given secret.
    ///
    /// An empty secret is rejected so the server cannot start without one.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(Error::MissingSessionSecret);
        }

        Ok(Self {
            secret,
            previous_secrets: Vec::new(),
            cookie_name: "remixblog_session".to_string(),
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: 60 * 60 * 24 * 60,
        })
    }

    /// Build the cookie policy from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut session = Self::new(config.session.secret.clone())?;
        session.previous_secrets = config
            .session
            .previous_secrets
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        session.cookie_name = config.session.cookie_name.clone();
        session.max_age_secs = config.session.max_age_secs;
        session.secure = config.server.environment.is_production();
        Ok(session)
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.cookie_name, value);
        cookie.push_str(&self.common_attrs());
        cookie.push_str(&format!("; Max-Age={}", self.max_age_secs));
        cookie
    }

    /// Build Set-Cookie header that makes the browser drop the cookie
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.cookie_name);
        cookie.push_str(&self.common_attrs());
        cookie.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        cookie
    }

    fn common_attrs(&self) -> String {
        let mut attrs = format!("; Path={}", self.path);
        if self.http_only {
            attrs.push_str("; HttpOnly");
        }
        attrs.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }
}

/// Decoded session contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    /// A fresh session with nothing in it
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Signed cookie payload
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    iat: i64,
    exp: i64,
}

/// Issues, reads and destroys session cookies
#[derive(Clone)]
pub struct SessionManager {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_keys: Vec<DecodingKey>,
    validation: Validation,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        let decoding_keys = std::iter::once(&config.secret)
            .chain(config.previous_secrets.iter())
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
            .collect();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            config: config.clone(),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_keys,
            validation,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sign a session into a Set-Cookie header value
    pub fn commit_session(&self, session: &Session) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: session.user_id.clone(),
            iat: now,
            exp: now + self.config.max_age_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(self.config.build_set_cookie(&token))
    }

    /// Set-Cookie header value that clears the session
    pub fn destroy_session(&self, _session: &Session) -> String {
        self.config.build_delete_cookie()
    }

    /// Verify a raw cookie value. Anything that fails verification is an
    /// empty session.
    pub fn read_session(&self, token: &str) -> Session {
        for key in &self.decoding_keys {
            match decode::<SessionClaims>(token, key, &self.validation) {
                Ok(data) => {
                    return Session {
                        user_id: data.claims.user_id,
                    }
                }
                Err(e) => tracing::trace!("Session cookie rejected by key: {}", e),
            }
        }

        tracing::debug!("Ignoring invalid or expired session cookie");
        Session::new()
    }

    /// Start a new session for `user_id` and redirect to `redirect_to`
    pub fn create_user_session(&self, user_id: &str, redirect_to: &str) -> Response {
        let mut session = Session::new();
        session.set_user_id(user_id);

        match self.commit_session(&session) {
            Ok(cookie) => redirect_with_cookie(redirect_to, cookie),
            Err(e) => e.into_response(),
        }
    }

    /// Session carried by the request's Cookie header, or an empty one
    pub fn get_user_session(&self, headers: &HeaderMap) -> Session {
        match extract_cookie(headers, &self.config.cookie_name) {
            Some(token) if !token.is_empty() => self.read_session(&token),
            _ => Session::new(),
        }
    }

    /// Resolve the request's session to a stored user.
    ///
    /// Every failure, including a storage error, resolves to `None`.
    pub async fn get_user<S>(&self, headers: &HeaderMap, store: &S) -> Option<User>
    where
        S: UserStore + ?Sized,
    {
        let session = self.get_user_session(headers);
        let user_id = session.user_id().filter(|id| is_well_formed_id(id))?;

        match store.find_user_by_id(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::debug!(user_id, "Session refers to a missing user");
                None
            }
            Err(e) => {
                tracing::warn!(user_id, "User lookup failed while resolving session: {}", e);
                None
            }
        }
    }

    /// Destroy the request's session and redirect to the logout page
    pub fn logout(&self, headers: &HeaderMap) -> Response {
        let session = self.get_user_session(headers);
        if let Some(user_id) = session.user_id() {
            tracing::info!(user_id, "User logged out");
        }
        redirect_with_cookie(LOGOUT_REDIRECT, self.destroy_session(&session))
    }
}

fn is_well_formed_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

fn redirect_with_cookie(to: &str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, to.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}
