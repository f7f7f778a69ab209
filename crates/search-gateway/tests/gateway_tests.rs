//! Router tests for search and submissions against a mocked search service.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use search_gateway::config::Config;
use search_gateway::server::{AppState, create_router};

fn build_test_router(mock_server: &MockServer) -> axum::Router {
    router_for(&Config::for_testing(&mock_server.uri()))
}

fn router_for(config: &Config) -> axum::Router {
    let state = Arc::new(AppState::from_config(config).unwrap());
    create_router(state, Path::new("does-not-exist")).unwrap()
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri).header("Content-Type", "application/json").body(body.into()).unwrap()
}

async fn body_json_value(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn sample_ref(gist_id: &str, title: &str) -> serde_json::Value {
    json!({
        "href": format!("/gists/{gist_id}"),
        "owner": "ada",
        "gistId": gist_id,
        "title": title,
        "author": "Ada Lovelace",
        "keywords": ["math", "engine"]
    })
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_relays_upstream_refs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": "analytical engine", "size": 30})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "found": 3,
            "start": 0,
            "refs": [
                sample_ref("a1", "Notes"),
                sample_ref("b2", "Bernoulli Numbers"),
                sample_ref("c3", "Loops")
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app
        .oneshot(post_json("/search", json!({"query": "analytical engine"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_value(response).await;
    assert_eq!(body["found"], 3);
    assert_eq!(body["start"], 0);

    let refs = body["refs"].as_array().unwrap();
    assert_eq!(refs.len(), 3, "ref count should match upstream hit count");
    assert_eq!(refs[1]["gistId"], "b2");
    assert_eq!(refs[1]["title"], "Bernoulli Numbers");
    assert_eq!(refs[0]["keywords"], json!(["math", "engine"]));
}

#[tokio::test]
async fn test_search_with_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "found": 0,
            "start": 0,
            "refs": []
        })))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app.oneshot(post_json("/search", r#"{"query":"xyzzy"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_value(response).await;
    assert_eq!(body["found"], 0);
    assert!(body["refs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_accepts_body_without_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"found": 0, "start": 0, "refs": []})))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let request = Request::post("/search").body(Body::from(r#"{"query":"q"}"#)).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_search_malformed_json_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);

    for body in ["{not json", "", "[]", r#"{"query": 42}"#, "{}"] {
        let response = app.clone().oneshot(post_json("/search", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?} should be rejected");
        assert_eq!(body_text(response).await, "Bad request");
    }
}

#[tokio::test]
async fn test_search_upstream_error_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index unavailable"))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app.oneshot(post_json("/search", r#"{"query":"q"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(!text.contains("index unavailable"), "upstream detail must not leak");
}

#[tokio::test]
async fn test_search_unparseable_upstream_reply_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app.oneshot(post_json("/search", r#"{"query":"q"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn test_submission_forwarded_to_service() {
    let mock_server = MockServer::start().await;

    let submission = json!({
        "author": "Ada Lovelace",
        "gistId": "f00d",
        "keywords": ["math"],
        "owner": "ada",
        "title": "Notes"
    });

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .and(body_json(submission.clone()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let response = app.oneshot(post_json("/submissions", submission.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_submission_malformed_json_is_bad_request() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    for body in ["nope", r#"{"author":"Ada"}"#, r#"{"author":"Ada","gistId":"g","owner":"o","title":"t","keywords":"x"}"#] {
        let response = app.clone().oneshot(post_json("/submissions", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?} should be rejected");
    }
}

#[tokio::test]
async fn test_submission_upstream_rejection_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("duplicate gist"))
        .mount(&mock_server)
        .await;

    let app = build_test_router(&mock_server);
    let body = json!({"author": "A", "gistId": "g", "owner": "o", "title": "t"}).to_string();
    let response = app.oneshot(post_json("/submissions", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submission_not_retried_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config { max_retries: 3, ..Config::for_testing(&mock_server.uri()) };
    let body = json!({"author": "A", "gistId": "g", "owner": "o", "title": "t"}).to_string();
    let response = router_for(&config).oneshot(post_json("/submissions", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_retries_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "found": 1,
            "start": 0,
            "refs": [sample_ref("g1", "Retried")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config { max_retries: 1, ..Config::for_testing(&mock_server.uri()) };
    let response = router_for(&config)
        .oneshot(post_json("/search", json!({"query": "retry"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_value(response).await;
    assert_eq!(body["refs"][0]["title"], "Retried");
}

#[tokio::test]
async fn test_search_single_attempt_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        max_retries: search_gateway::config::defaults::MAX_RETRIES,
        ..Config::for_testing(&mock_server.uri())
    };
    let response = router_for(&config)
        .oneshot(post_json("/search", json!({"query": "once"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_backend() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_none());
    let body = body_json_value(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "service");
}
