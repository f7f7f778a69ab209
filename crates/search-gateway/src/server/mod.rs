//! HTTP server for the gateway.
//!
//! Routes:
//! - `POST /search`, `POST /submissions` forward to the search backend
//! - `GET /authenticate/{code}` exchanges an OAuth code for a token
//! - `GET /github_callback` serves the OAuth redirect page
//! - `GET /health` reports liveness
//! - everything else is served from the generated asset directory

pub mod assets;
pub mod extract;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

pub use routes::{AppState, create_router};

use crate::config::Config;

/// The gateway server.
pub struct GatewayServer {
    /// Handler state.
    state: Arc<AppState>,

    /// Directory of generated static assets.
    static_dir: PathBuf,
}

impl GatewayServer {
    /// Create a server and its upstream clients.
    ///
    /// # Errors
    ///
    /// Returns error if an upstream client cannot be initialised.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let state = Arc::new(AppState::from_config(config)?);
        Ok(Self { state, static_dir: config.static_dir.clone() })
    }

    /// Handler state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        let router = create_router(Arc::clone(&self.state), &self.static_dir)?;

        tracing::info!(
            backend = self.state.backend.name(),
            static_dir = %self.static_dir.display(),
            "HTTP server listening on http://{}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for GatewayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServer")
            .field("state", &self.state)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
