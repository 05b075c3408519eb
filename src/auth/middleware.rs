//! Authentication extractors

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use std::convert::Infallible;
use std::sync::Arc;

use crate::auth::{SessionManager, User};
use crate::store::Store;

/// Login page used when a route needs a user
pub const LOGIN_PATH: &str = "/auth/login";

/// State that can resolve a request to its user
pub trait AuthState {
    fn sessions(&self) -> &SessionManager;

    fn user_store(&self) -> &dyn Store;
}

impl<T: AuthState> AuthState for Arc<T> {
    fn sessions(&self) -> &SessionManager {
        (**self).sessions()
    }

    fn user_store(&self) -> &dyn Store {
        (**self).user_store()
    }
}

/// The logged-in user, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: AuthState + Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = state
            .sessions()
            .get_user(&parts.headers, state.user_store())
            .await;
        Ok(CurrentUser(user))
    }
}

/// The logged-in user; anonymous requests are redirected to the login page
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    S: AuthState + Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match state
            .sessions()
            .get_user(&parts.headers, state.user_store())
            .await
        {
            Some(user) => Ok(RequireUser(user)),
            None => {
                tracing::debug!("Anonymous request to {} redirected to login", parts.uri.path());
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
        }
    }
}
