//! Middleware Stack Tests
//!
//! Runs routers through the same body limit, CORS and trace layers the
//! binary applies.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use url::Url;

use common::send;
use murmur::http::{self, API_METHODS};
use murmur::proxy::{self, ProxyState, PROXY_METHODS};

fn layered_api(origin: Option<&str>, body_limit: usize) -> Router {
    let app = common::app();
    http::with_layers(app.router(), origin, API_METHODS, body_limit).unwrap()
}

fn preflight(path: &str, method: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri(path)
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, method)
        .body(Body::empty())
        .unwrap()
}

fn allow_methods(resp: &common::TestResponse) -> String {
    resp.headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn layered_api_serves_requests() {
    let router = layered_api(None, 64 * 1024);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header("X-Wallet-Address", "0xA")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content":"hello"}"#))
        .unwrap();
    let resp = send(&router, request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["id"], 1);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let router = layered_api(None, 16);

    let body = format!(r#"{{"content":"{}"}}"#, "x".repeat(64));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header("X-Wallet-Address", "0xA")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let resp = send(&router, request).await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn api_preflight_offers_only_served_methods() {
    let router = layered_api(None, 64 * 1024);

    let resp = send(&router, preflight("/posts", "POST")).await;

    assert!(resp.status.is_success());
    let methods = allow_methods(&resp);
    assert!(methods.contains("GET"));
    assert!(methods.contains("POST"));
    assert!(!methods.contains("DELETE"));
    assert_eq!(resp.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn proxy_preflight_offers_delete() {
    let origin = Url::parse("http://127.0.0.1:9").unwrap();
    let state = ProxyState::new(origin, Duration::from_secs(1)).unwrap();
    let router = http::with_layers(proxy::router(state), None, PROXY_METHODS, 64 * 1024).unwrap();

    let resp = send(&router, preflight("/api/posts/1", "DELETE")).await;

    assert!(resp.status.is_success());
    assert!(allow_methods(&resp).contains("DELETE"));
}

#[tokio::test]
async fn configured_origin_is_echoed() {
    let router = layered_api(Some("https://app.example"), 64 * 1024);

    let resp = send(&router, preflight("/posts", "POST")).await;

    assert_eq!(
        resp.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example"
    );
}

#[test]
fn invalid_origin_is_a_config_error() {
    assert!(http::cors_layer(Some("bad\norigin"), API_METHODS).is_err());
}
