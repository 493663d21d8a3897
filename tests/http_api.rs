//! HTTP adapter tests, driven in-process through the router

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use songkey::server::create_router;
use songkey::{FallbackCatalog, MetadataClient, ProviderConfig, SongKeyResolver};
use std::sync::Arc;
use tower::ServiceExt;

fn offline_router() -> axum::Router {
    let client = MetadataClient::new(ProviderConfig::unconfigured()).unwrap();
    create_router(Arc::new(SongKeyResolver::new(client, FallbackCatalog::new())))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = offline_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/song-key")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn get_with_q_parameter() {
    let (status, body) = send(get("/song-key?q=key%20of%20Hey%20Jude%20by%20The%20Beatles")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "\"Hey Jude\" by The Beatles is in the key of F Major (source: local database)"
    );
}

#[tokio::test]
async fn get_with_query_parameter() {
    let (status, body) = send(get("/song-key?query=key%20of%20Imagine")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "\"Imagine\" by John Lennon is in the key of C Major (source: local database)"
    );
}

#[tokio::test]
async fn blank_q_does_not_hide_query_parameter() {
    let (status, body) = send(get("/song-key?q=&query=key%20of%20Imagine")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "\"Imagine\" by John Lennon is in the key of C Major (source: local database)"
    );
}

#[tokio::test]
async fn post_with_json_body() {
    let (status, body) = send(post_json(json!({ "query": "key of Perfect by Ed Sheeran?" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "\"Perfect\" by Ed Sheeran is in the key of Ab Major (source: local database)"
    );
}

#[tokio::test]
async fn unparseable_question_is_a_normal_answer() {
    let (status, body) = send(post_json(json!({ "query": "banana smoothie recipe" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("I couldn't understand that format"));
}

#[tokio::test]
async fn not_found_is_a_normal_answer() {
    let (status, body) = send(get("/song-key?q=key%20of%20Xyzzy")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("Xyzzy"));
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let (status, body) = send(get("/song-key")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a query");

    let (status, body) = send(post_json(json!({ "query": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a query");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/song-key")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a query");
}

#[tokio::test]
async fn health_reports_provider_state() {
    let (status, body) = send(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider_configured"], false);
}
