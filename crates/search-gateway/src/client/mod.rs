//! Upstream clients.
//!
//! Upstream calls go through reqwest clients wrapped with
//! `reqwest-middleware`. Only search queries may be retried:
//! - [`ServiceClient`]: the HTTP search/submission service
//! - [`CloudSearchClient`]: an AWS CloudSearch domain, SigV4-signed
//! - [`GitHubOAuthClient`]: OAuth code-for-token exchange

mod cloudsearch;
mod oauth;
mod service;
pub mod sigv4;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{BackendKind, Config, defaults};
use crate::error::{ClientError, ClientResult};
use crate::models::{SearchResponse, Submission};

pub use cloudsearch::CloudSearchClient;
pub use oauth::GitHubOAuthClient;
pub use service::ServiceClient;

/// A search index the gateway can query and submit to.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Run a free-text query and return the first page of refs.
    async fn search(&self, query: &str) -> ClientResult<SearchResponse>;

    /// Index a submission.
    async fn submit(&self, submission: &Submission) -> ClientResult<()>;
}

/// Build the pooled reqwest client every upstream call goes through.
fn base_client(config: &Config) -> anyhow::Result<Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
        .default_headers(headers)
        .user_agent(concat!("search-gateway/", env!("CARGO_PKG_VERSION")))
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(defaults::MAX_KEEPALIVE)
        .pool_idle_timeout(defaults::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    Ok(client)
}

/// Build the upstream client for single-attempt calls.
///
/// Submissions and OAuth code exchanges are not idempotent (a code can be
/// redeemed once), so this client never retries.
///
/// # Errors
///
/// Returns error if HTTP client initialization fails.
pub fn http_client(config: &Config) -> anyhow::Result<ClientWithMiddleware> {
    Ok(ClientBuilder::new(base_client(config)?).build())
}

/// Build the upstream client for search queries.
///
/// Retries transient failures up to `config.max_retries` times with bounded
/// exponential backoff; with 0 it behaves like [`http_client`].
///
/// # Errors
///
/// Returns error if HTTP client initialization fails.
pub fn search_client(config: &Config) -> anyhow::Result<ClientWithMiddleware> {
    let client = base_client(config)?;
    if config.max_retries == 0 {
        return Ok(ClientBuilder::new(client).build());
    }

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(500), Duration::from_secs(10))
        .build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Build the configured search backend.
///
/// # Errors
///
/// Returns error if the CloudSearch backend is selected without its settings,
/// or an endpoint URL does not parse.
pub fn build_backend(
    config: &Config,
    http: ClientWithMiddleware,
) -> anyhow::Result<Arc<dyn SearchBackend>> {
    let search = search_client(config)?;

    match config.backend {
        BackendKind::Service => Ok(Arc::new(
            ServiceClient::new(http, &config.search_service_url, config.search_page_size)
                .with_search_client(search),
        )),
        BackendKind::Cloudsearch => {
            let Some(ref cloudsearch) = config.cloudsearch else {
                anyhow::bail!("cloudsearch backend selected but no CloudSearch endpoints configured");
            };
            Ok(Arc::new(
                CloudSearchClient::new(http, cloudsearch, config.search_page_size)?
                    .with_search_client(search),
            ))
        }
    }
}

/// Map upstream status codes onto [`ClientError`].
pub(crate) async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match status.as_u16() {
        400 => Err(ClientError::bad_request(text)),
        404 => Err(ClientError::not_found(text)),
        500..=599 => Err(ClientError::server(status.as_u16(), text)),
        _ => Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text }),
    }
}

/// Read a successful response body as JSON.
pub(crate) async fn read_json<T>(response: reqwest::Response) -> ClientResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::from)
}
