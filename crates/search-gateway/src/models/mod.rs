//! Request and response DTOs exchanged with clients and upstreams.
//!
//! Client-facing shapes keep the JSON names the front end already uses
//! (`gistId`, `refs`, `found`). Unknown fields are ignored on input.

mod oauth;
mod search;
mod submission;

pub use oauth::{AccessTokenGrant, ExchangePayload, TokenResponse};
pub use search::{SearchRef, SearchRequest, SearchResponse};
pub use submission::Submission;
