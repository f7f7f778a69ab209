//! Search Gateway
//!
//! A small HTTP gateway in front of a gist search backend and GitHub's OAuth
//! token exchange. It decodes JSON from the web front end, calls one
//! upstream, and relays the result as JSON.
//!
//! # Features
//!
//! - **Two backends**: the HTTP search/submission service, or an AWS
//!   CloudSearch domain addressed directly with SigV4 signing
//! - **Server-side OAuth exchange**: the client secret never reaches the browser
//! - **Static front end**: generated assets served with the client id cookie
//!
//! # Example
//!
//! ```no_run
//! use search_gateway::{config::Config, server::GatewayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = GatewayServer::new(&config)?;
//!     server.run(config.bind_addr).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use client::{CloudSearchClient, GitHubOAuthClient, SearchBackend, ServiceClient};
pub use config::Config;
pub use error::{ClientError, GatewayError};
