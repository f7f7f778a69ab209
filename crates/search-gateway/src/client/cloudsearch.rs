//! Direct client for an AWS CloudSearch domain.
//!
//! Searches go to the domain's search endpoint, submissions to its document
//! endpoint as single-operation batches. Both use the `2013-01-01` API and
//! are signed with SigV4 under the `cloudsearch` service name.

use std::collections::HashMap;

use chrono::Utc;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use url::Url;

use super::sigv4::{Signer, canonical_query};
use super::{SearchBackend, read_json};
use crate::config::CloudSearchConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{SearchRef, SearchResponse, Submission};

/// CloudSearch API version path segment.
const API_VERSION: &str = "2013-01-01";

/// Service name used in the SigV4 credential scope.
const SIGNING_SERVICE: &str = "cloudsearch";

/// CloudSearch domain client.
#[derive(Clone)]
pub struct CloudSearchClient {
    /// Single-attempt client for document batches.
    client: ClientWithMiddleware,

    /// Client for search queries, possibly retrying.
    search_client: ClientWithMiddleware,

    /// `{search_endpoint}/2013-01-01/search`
    search_url: Url,

    /// `{document_endpoint}/2013-01-01/documents/batch`
    batch_url: Url,

    /// Request signer.
    signer: Signer,

    /// Results requested per search.
    page_size: u32,
}

impl CloudSearchClient {
    /// Create a client for the configured domain.
    ///
    /// # Errors
    ///
    /// Returns error if either endpoint is not a valid URL.
    pub fn new(
        client: ClientWithMiddleware,
        config: &CloudSearchConfig,
        page_size: u32,
    ) -> ClientResult<Self> {
        let search_url = endpoint_url(&config.search_endpoint, "search")?;
        let batch_url = endpoint_url(&config.document_endpoint, "documents/batch")?;
        let signer = Signer::new(config.credentials.clone(), &config.region, SIGNING_SERVICE);

        Ok(Self { search_client: client.clone(), client, search_url, batch_url, signer, page_size })
    }

    /// Send search queries through `client` instead.
    #[must_use]
    pub fn with_search_client(mut self, client: ClientWithMiddleware) -> Self {
        self.search_client = client;
        self
    }

    /// Send a signed request through `client`.
    async fn send_signed(
        &self,
        client: &ClientWithMiddleware,
        method: reqwest::Method,
        url: Url,
        body: Vec<u8>,
    ) -> ClientResult<reqwest::Response> {
        let signed = self.signer.sign(method.as_str(), &url, &body, Utc::now());

        let mut request = client
            .request(method, url)
            .header("Authorization", signed.authorization)
            .header("x-amz-date", signed.amz_date);

        if let Some(token) = signed.security_token {
            request = request.header("x-amz-security-token", token);
        }
        if !body.is_empty() {
            request = request.header("Content-Type", "application/json").body(body);
        }

        Ok(request.send().await?)
    }
}

#[async_trait::async_trait]
impl SearchBackend for CloudSearchClient {
    fn name(&self) -> &'static str {
        "cloudsearch"
    }

    async fn search(&self, query: &str) -> ClientResult<SearchResponse> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("size".to_string(), self.page_size.to_string()),
            ("start".to_string(), "0".to_string()),
        ];

        let mut url = self.search_url.clone();
        url.set_query(Some(&canonical_query(&params)));

        let response =
            self.send_signed(&self.search_client, reqwest::Method::GET, url, Vec::new()).await?;
        let reply: SearchReply = read_json(response).await?;

        tracing::debug!(found = reply.hits.found, hits = reply.hits.hit.len(), "CloudSearch query complete");
        Ok(reply.into_response())
    }

    async fn submit(&self, submission: &Submission) -> ClientResult<()> {
        let batch = serde_json::json!([{
            "type": "add",
            "id": submission.gist_id,
            "fields": {
                "author": submission.author,
                "gistid": submission.gist_id,
                "keywords": submission.keywords,
                "owner": submission.owner,
                "title": submission.title
            }
        }]);
        let body = serde_json::to_vec(&batch)?;

        let response = self
            .send_signed(&self.client, reqwest::Method::POST, self.batch_url.clone(), body)
            .await?;
        let reply: BatchReply = read_json(response).await?;

        if reply.status != "success" {
            let messages: Vec<String> = reply.errors.into_iter().map(|e| e.message).collect();
            return Err(ClientError::Rejected(if messages.is_empty() {
                reply.status
            } else {
                messages.join("; ")
            }));
        }

        tracing::debug!(gist_id = %submission.gist_id, adds = reply.adds, "CloudSearch accepted batch");
        Ok(())
    }
}

impl std::fmt::Debug for CloudSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudSearchClient")
            .field("search_url", &self.search_url.as_str())
            .field("batch_url", &self.batch_url.as_str())
            .field("signer", &self.signer)
            .finish()
    }
}

fn endpoint_url(endpoint: &str, resource: &str) -> ClientResult<Url> {
    let endpoint = endpoint.trim_end_matches('/');
    let endpoint = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    };

    Url::parse(&format!("{}/{}/{}", endpoint, API_VERSION, resource))
        .map_err(|e| ClientError::config(format!("invalid CloudSearch endpoint '{endpoint}': {e}")))
}

/// Search reply from the `2013-01-01` API.
#[derive(Debug, Deserialize)]
struct SearchReply {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    found: u64,
    #[serde(default)]
    start: u64,
    #[serde(default)]
    hit: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    id: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

/// Returned field values are strings for single-valued fields, arrays otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    fn first(&self) -> Option<&str> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(v) => v.first().map(String::as_str),
        }
    }

    fn all(&self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s.clone()],
            Self::Many(v) => v.clone(),
        }
    }
}

impl Hit {
    fn text(&self, field: &str) -> String {
        self.fields.get(field).and_then(FieldValue::first).unwrap_or_default().to_string()
    }

    fn into_ref(self) -> SearchRef {
        let gist_id = match self.fields.get("gistid").and_then(FieldValue::first) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.id.clone(),
        };

        SearchRef {
            href: format!("/gists/{}", gist_id),
            owner: self.text("owner"),
            title: self.text("title"),
            author: self.text("author"),
            keywords: self.fields.get("keywords").map(FieldValue::all).unwrap_or_default(),
            gist_id,
        }
    }
}

impl SearchReply {
    fn into_response(self) -> SearchResponse {
        SearchResponse {
            found: self.hits.found,
            start: self.hits.start,
            refs: self.hits.hit.into_iter().map(Hit::into_ref).collect(),
        }
    }
}

/// Document batch reply.
#[derive(Debug, Deserialize)]
struct BatchReply {
    status: String,
    #[serde(default)]
    adds: u64,
    #[serde(default)]
    errors: Vec<BatchError>,
}

#[derive(Debug, Deserialize)]
struct BatchError {
    message: String,
}
