//! Router construction and shared handler state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{assets, handlers};
use crate::client::{self, GitHubOAuthClient, SearchBackend};
use crate::config::Config;

/// Shared, read-only state for handlers.
pub struct AppState {
    /// Selected search backend.
    pub backend: Arc<dyn SearchBackend>,

    /// OAuth code exchange client.
    pub oauth: GitHubOAuthClient,

    /// Directory holding the callback template.
    pub template_dir: PathBuf,
}

impl AppState {
    /// Build handler state and its upstream clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an upstream client cannot be initialised.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = client::http_client(config)?;
        let backend = client::build_backend(config, http.clone())?;
        let oauth = GitHubOAuthClient::new(http, config);

        Ok(Self { backend, oauth, template_dir: config.template_dir.clone() })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend.name())
            .field("oauth", &self.oauth)
            .field("template_dir", &self.template_dir)
            .finish()
    }
}

/// Create the gateway router.
///
/// API routes are matched first; every other path falls through to the
/// static files under `static_dir`.
///
/// # Errors
///
/// Returns error if the client id cannot be sent as a cookie.
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> anyhow::Result<Router> {
    let static_files = assets::static_files(static_dir, state.oauth.client_id())?;

    Ok(Router::new()
        .route("/health", get(handlers::health_check))
        .route("/search", post(handlers::search))
        .route("/submissions", post(handlers::submit))
        .route("/authenticate/{code}", get(handlers::authenticate))
        .route("/github_callback", get(handlers::github_callback))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
