//! Client for the HTTP search/submission service.

use reqwest_middleware::ClientWithMiddleware;

use super::{SearchBackend, check_status, read_json};
use crate::error::ClientResult;
use crate::models::{SearchResponse, Submission};

/// Search/submission service client.
#[derive(Clone)]
pub struct ServiceClient {
    /// Single-attempt client for submissions.
    client: ClientWithMiddleware,

    /// Client for search queries, possibly retrying.
    search_client: ClientWithMiddleware,

    /// Service base URL, without trailing slash.
    base_url: String,

    /// Results requested per search.
    page_size: u32,
}

impl ServiceClient {
    /// Create a client for the service at `base_url`.
    ///
    /// `client` carries every request until a separate search client is set.
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: &str, page_size: u32) -> Self {
        Self {
            search_client: client.clone(),
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
        }
    }

    /// Send search queries through `client` instead.
    #[must_use]
    pub fn with_search_client(mut self, client: ClientWithMiddleware) -> Self {
        self.search_client = client;
        self
    }

    /// Service base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body through `client` and return the response.
    async fn post(
        &self,
        client: &ClientWithMiddleware,
        path: &str,
        body: &serde_json::Value,
    ) -> ClientResult<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path);
        let body_str = serde_json::to_string(body)?;

        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body_str)
            .send()
            .await?;

        Ok(response)
    }
}

#[async_trait::async_trait]
impl SearchBackend for ServiceClient {
    fn name(&self) -> &'static str {
        "service"
    }

    async fn search(&self, query: &str) -> ClientResult<SearchResponse> {
        let body = serde_json::json!({
            "query": query,
            "size": self.page_size
        });

        let response = self.post(&self.search_client, "search", &body).await?;
        let result: SearchResponse = read_json(response).await?;

        tracing::debug!(found = result.found, refs = result.refs.len(), "Service search complete");
        Ok(result)
    }

    async fn submit(&self, submission: &Submission) -> ClientResult<()> {
        let body = serde_json::to_value(submission)?;
        let response = self.post(&self.client, "submissions", &body).await?;
        check_status(response).await?;

        tracing::debug!(gist_id = %submission.gist_id, "Service accepted submission");
        Ok(())
    }
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient").field("base_url", &self.base_url).finish()
    }
}
