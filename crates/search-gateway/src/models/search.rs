//! Search request and response models.

use serde::{Deserialize, Serialize};

/// A search submitted by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
}

impl SearchRequest {
    /// Create a search request.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of matching documents.
    #[serde(default)]
    pub found: u64,

    /// Offset of the first ref in this page.
    #[serde(default)]
    pub start: u64,

    /// Matching documents, in backend rank order.
    #[serde(default)]
    pub refs: Vec<SearchRef>,
}

impl SearchResponse {
    /// Check if the backend reported more matches than this page holds.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.start.saturating_add(self.refs.len() as u64) < self.found
    }
}

/// Reference to a single gist in a result page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRef {
    /// Link to the gist within the front end.
    #[serde(default)]
    pub href: String,

    /// GitHub login of the gist owner.
    #[serde(default)]
    pub owner: String,

    /// GitHub gist id.
    #[serde(default)]
    pub gist_id: String,

    /// Project title.
    #[serde(default)]
    pub title: String,

    /// Display name of the author.
    #[serde(default)]
    pub author: String,

    /// Keywords attached at submission time.
    #[serde(default)]
    pub keywords: Vec<String>,
}
