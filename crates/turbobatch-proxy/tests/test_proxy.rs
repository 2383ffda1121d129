//! Proxy tests
//!
//! Requests go through the router with `oneshot`; the upstream is a mock
//! server.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;
use turbobatch_proxy::{ProxyConfig, ProxyState, router};
use wiremock::matchers::{body_json, header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BATCH_ID: &str = "msgbatch_01234567890";

fn app(upstream: &str) -> axum::Router {
    let config = ProxyConfig::default().with_upstream(format!("{}/v1/", upstream));
    router(ProxyState::new(config).unwrap())
}

async fn send(app: axum::Router, request: Request<Body>) -> (Response, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap().to_vec();
    (Response::from_parts(parts, Body::empty()), bytes)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-api-key", "test-key")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_preflight() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/messages/batches")
        .body(Body::empty())
        .unwrap();

    let (response, body) = send(app("http://127.0.0.1:9"), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body.is_empty());
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, x-api-key, anthropic-version"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
}

#[rstest]
#[case("PUT")]
#[case("DELETE")]
#[case("PATCH")]
#[tokio::test]
async fn test_method_not_allowed(#[case] verb: &str) {
    let request = Request::builder()
        .method(verb)
        .uri("/messages/batches")
        .header("x-api-key", "test-key")
        .body(Body::empty())
        .unwrap();

    let (response, body) = send(app("http://127.0.0.1:9"), request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body, b"Method not allowed");
}

#[tokio::test]
async fn test_missing_api_key() {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/messages/batches/{}", BATCH_ID))
        .body(Body::empty())
        .unwrap();

    let (response, body) = send(app("http://127.0.0.1:9"), request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": {"type": "worker_error", "message": "Missing API key"}})
    );
}

#[tokio::test]
async fn test_invalid_batch_id() {
    let (response, body) = send(app("http://127.0.0.1:9"), get("/messages/batches/batch_42")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["type"], "worker_error");
    assert_eq!(
        body["error"]["message"],
        "Message Batch id must have `msgbatch_` prefix."
    );
}

#[tokio::test]
async fn test_results_become_json_array() {
    let upstream = MockServer::start().await;

    let jsonl = [
        r#"{"custom_id":"a","result":{"type":"succeeded"}}"#,
        r#"{"custom_id":"b","result":{"type":"errored"}}"#,
        r#"{"custom_id":"c","result":{"type":"expired"}}"#,
    ]
    .join("\n");

    Mock::given(method("GET"))
        .and(path(format!("/v1/messages/batches/{}/results", BATCH_ID)))
        .and(header_matcher("x-api-key", "test-key"))
        .and(header_matcher("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(jsonl))
        .expect(1)
        .mount(&upstream)
        .await;

    let (response, body) = send(
        app(&upstream.uri()),
        get(&format!("/messages/batches/{}/results", BATCH_ID)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body: Value = serde_json::from_slice(&body).unwrap();
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["custom_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_results_without_valid_lines() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/messages/batches/{}/results", BATCH_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage\n"))
        .mount(&upstream)
        .await;

    let (response, body) = send(
        app(&upstream.uri()),
        get(&format!("/messages/batches/{}/results", BATCH_ID)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["message"], "Failed to parse JSONL response");
    assert!(body["error"]["details"].as_str().unwrap().contains("No valid JSON lines"));
}

#[tokio::test]
async fn test_create_forwards_body_and_status() {
    let upstream = MockServer::start().await;
    let payload = json!({"requests": [{"custom_id": "r1", "params": {"model": "m", "max_tokens": 5}}]});
    let rejection = json!({"type": "error", "error": {"type": "invalid_request_error", "message": "bad"}});

    Mock::given(method("POST"))
        .and(path("/v1/messages/batches"))
        .and(header_matcher("anthropic-version", "2024-01-01"))
        .and(header_matcher("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(400).set_body_json(&rejection))
        .expect(1)
        .mount(&upstream)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/messages/batches")
        .header("x-api-key", "test-key")
        .header("anthropic-version", "2024-01-01")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (response, body) = send(app(&upstream.uri()), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), rejection);
}

#[tokio::test]
async fn test_large_create_body_is_forwarded() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages/batches"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": BATCH_ID, "processing_status": "in_progress"})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    // well past axum's default 2 MB extractor limit
    let message = "x".repeat(3 * 1024 * 1024);
    let payload = json!({"requests": [{"custom_id": "big", "params": {"messages": [{"role": "user", "content": message}]}}]})
        .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/messages/batches")
        .header("x-api-key", "test-key")
        .body(Body::from(payload.clone()))
        .unwrap();

    let (response, body) = send(app(&upstream.uri()), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap()["id"], BATCH_ID);

    let received = upstream.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body.len(), payload.len());
}

#[tokio::test]
async fn test_cancel_is_forwarded() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/messages/batches/{}/cancel", BATCH_ID)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": BATCH_ID, "processing_status": "canceling"})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/messages/batches/{}/cancel", BATCH_ID))
        .header("x-api-key", "test-key")
        .body(Body::empty())
        .unwrap();

    let (response, body) = send(app(&upstream.uri()), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["processing_status"], "canceling");
}

#[tokio::test]
async fn test_non_json_upstream_body() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/messages/batches/{}", BATCH_ID)))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&upstream)
        .await;

    let (response, body) =
        send(app(&upstream.uri()), get(&format!("/messages/batches/{}", BATCH_ID))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["message"], "Failed to parse JSON response");
    assert!(body["error"]["details"].is_string());
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let (response, body) = send(
        app("http://127.0.0.1:9"),
        get(&format!("/messages/batches/{}", BATCH_ID)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["message"], "Upstream request failed");
}
