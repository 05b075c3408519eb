//! HTTP server

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthState, BcryptHasher, CredentialService, SessionConfig, SessionManager};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, SharedStore, Store};
use crate::ui::Views;

use super::routes;

/// Application state shared across handlers. Read-only after startup.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
    pub credentials: CredentialService,
    pub store: SharedStore,
    pub views: Views,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire up the services. Fails if the session secret is missing.
    pub fn new(config: Config, store: SharedStore) -> Result<Self> {
        let session_config = SessionConfig::from_config(&config)?;
        let sessions = SessionManager::new(&session_config);
        let hasher = Arc::new(BcryptHasher::new(config.auth.bcrypt_cost));
        let credentials = CredentialService::new(Arc::clone(&store), hasher);
        let views = Views::new()?;

        Ok(Self {
            config,
            sessions,
            credentials,
            store,
            views,
        })
    }
}

impl AuthState for AppState {
    fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    fn user_store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Run the HTTP server until interrupted
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let store = store::connect(&config.database).await?;
    let secure = config.server.environment.is_production();
    let state = Arc::new(AppState::new(config, store)?);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {} (secure cookies: {})", addr, secure);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Serve on an already bound listener
pub async fn serve(listener: tokio::net::TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/", get(routes::index))
        // Posts
        .route("/posts", get(routes::list_posts))
        .route(
            "/posts/new",
            get(routes::new_post_form).post(routes::create_post),
        )
        .route(
            "/posts/{id}",
            get(routes::show_post).post(routes::post_action),
        )
        // Auth
        .route("/auth/login", get(routes::login_form).post(routes::login))
        .route(
            "/auth/logout",
            get(routes::logged_out).post(routes::logout),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
