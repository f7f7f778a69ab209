//! GitHub OAuth code exchange.
//!
//! The exchange runs server-side so the client secret never reaches the browser.

use reqwest_middleware::ClientWithMiddleware;

use super::check_status;
use crate::config::Config;
use crate::error::ClientResult;
use crate::models::{AccessTokenGrant, ExchangePayload};

/// Exchanges temporary authorization codes for access tokens.
#[derive(Clone)]
pub struct GitHubOAuthClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Token endpoint.
    token_url: String,

    /// OAuth application client id.
    client_id: String,

    /// OAuth application client secret.
    client_secret: String,
}

impl GitHubOAuthClient {
    /// Create an exchange client from the gateway configuration.
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &Config) -> Self {
        Self {
            client,
            token_url: config.oauth_token_url.clone(),
            client_id: config.github_client_id.clone(),
            client_secret: config.github_client_secret.clone(),
        }
    }

    /// OAuth application client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Exchange `code` for an access token, returned exactly as issued.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-2xx status, or an `error`
    /// field in the provider's reply.
    pub async fn exchange(&self, code: &str) -> ClientResult<String> {
        let payload = ExchangePayload {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            code: code.to_string(),
        };
        let body_str = serde_json::to_string(&payload)?;

        let response = self
            .client
            .post(&self.token_url)
            .header("Content-Type", "application/json")
            .body(body_str)
            .send()
            .await?;

        let response = check_status(response).await?;
        let text = response.text().await?;

        AccessTokenGrant::parse(&text)?.into_token()
    }
}

impl std::fmt::Debug for GitHubOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubOAuthClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("has_client_secret", &!self.client_secret.is_empty())
            .finish()
    }
}
