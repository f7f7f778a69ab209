//! Request handlers.
//!
//! Each handler decodes its input, calls exactly one upstream and encodes the
//! result. Failures are returned as [`GatewayError`], which logs and collapses
//! them to a generic status.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::extract::JsonBody;
use super::routes::AppState;
use crate::error::GatewayResult;
use crate::models::{SearchRequest, SearchResponse, Submission, TokenResponse};

/// Template file served by [`github_callback`].
pub const CALLBACK_TEMPLATE: &str = "github_callback.html";

/// `POST /search`
pub async fn search(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SearchRequest>,
) -> GatewayResult<Json<SearchResponse>> {
    tracing::debug!(query = %req.query, backend = state.backend.name(), "Handling search");

    let response = state.backend.search(&req.query).await?;
    Ok(Json(response))
}

/// `POST /submissions`
pub async fn submit(
    State(state): State<Arc<AppState>>,
    JsonBody(submission): JsonBody<Submission>,
) -> GatewayResult<impl IntoResponse> {
    tracing::info!(gist_id = %submission.gist_id, owner = %submission.owner, "Handling submission");

    state.backend.submit(&submission).await?;
    Ok((StatusCode::OK, "OK"))
}

/// `GET /authenticate/{code}`
///
/// Trades a temporary authorization code for a token on behalf of the front
/// end, which never sees the client secret.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> GatewayResult<Json<TokenResponse>> {
    let token = state.oauth.exchange(&code).await?;

    tracing::info!("Exchanged authorization code for token");
    Ok(Json(TokenResponse { token }))
}

/// `GET /github_callback`
///
/// Page GitHub redirects to after authorization; it scrapes `code` and `state`
/// from its own URL on the client side.
pub async fn github_callback(State(state): State<Arc<AppState>>) -> GatewayResult<Html<String>> {
    let path = state.template_dir.join(CALLBACK_TEMPLATE);
    let html = tokio::fs::read_to_string(&path).await?;
    Ok(Html(html))
}

/// `GET /health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "search-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.backend.name()
    }))
}
