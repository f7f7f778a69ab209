//! OAuth code exchange models.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Body posted to the OAuth provider to trade a code for a token.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExchangePayload {
    /// OAuth application client id.
    pub client_id: String,
    /// OAuth application client secret.
    pub client_secret: String,
    /// Temporary authorization code from the redirect.
    pub code: String,
}

impl std::fmt::Debug for ExchangePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangePayload")
            .field("client_id", &self.client_id)
            .field("code", &self.code)
            .finish()
    }
}

/// Token handed back to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token as issued by the provider.
    pub token: String,
}

/// The provider's reply to a code exchange.
///
/// GitHub answers `application/x-www-form-urlencoded` unless asked for JSON,
/// so both encodings decode into this shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessTokenGrant {
    /// Issued access token.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token type, normally `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,

    /// Granted scopes, comma separated.
    #[serde(default)]
    pub scope: Option<String>,

    /// Error code when the exchange failed.
    #[serde(default)]
    pub error: Option<String>,

    /// Error description when the exchange failed.
    #[serde(default)]
    pub error_description: Option<String>,
}

impl AccessTokenGrant {
    /// Decode a provider reply body, JSON or form-urlencoded.
    pub fn parse(body: &str) -> ClientResult<Self> {
        let body = body.trim();
        if body.starts_with('{') {
            Ok(serde_json::from_str(body)?)
        } else {
            Ok(serde_urlencoded::from_str(body)?)
        }
    }

    /// The access token, or the provider's error.
    pub fn into_token(self) -> ClientResult<String> {
        if let Some(error) = self.error {
            return Err(ClientError::oauth(error, self.error_description));
        }
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ClientError::oauth("missing_access_token", None)),
        }
    }
}
