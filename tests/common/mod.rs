#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use murmur::domain::engagement::NewComment;
use murmur::domain::post::{NewPost, Post};
use murmur::domain::user::User;
use murmur::infra::store::{InMemoryStore, Store};
use murmur::AppState;

// ---------------------------------------------------------------------------
// TestApp: one fresh in-memory store per test
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub store: InMemoryStore,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

pub fn app() -> TestApp {
    let store = InMemoryStore::new();
    let state = AppState::new(Arc::new(store.clone()));
    let router = murmur::http::router(state.clone());

    TestApp {
        router,
        store,
        state,
    }
}

/// Serves `router` on an ephemeral local port and returns its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    listener.local_addr().expect("listener address")
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("oneshot failed");

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to collect body")
        .to_bytes();

    TestResponse {
        status,
        headers,
        body_bytes,
    }
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    // ------------------------------------------------------------------
    // Low-level request helper
    // ------------------------------------------------------------------
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        for &(key, value) in headers {
            builder = builder.header(key, value);
        }

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        send(&self.router, request).await
    }

    // ------------------------------------------------------------------
    // Convenience HTTP helpers
    // ------------------------------------------------------------------
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, &[]).await
    }

    pub async fn post_json(&self, path: &str, body: Value, wallet: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        if let Some(w) = wallet {
            headers.push(("X-Wallet-Address", w));
        }
        self.request(Method::POST, path, Some(body), &headers).await
    }

    pub async fn post_empty(&self, path: &str, wallet: Option<&str>) -> TestResponse {
        let mut headers = vec![];
        if let Some(w) = wallet {
            headers.push(("X-Wallet-Address", w));
        }
        self.request(Method::POST, path, None, &headers).await
    }

    // ------------------------------------------------------------------
    // Test data helpers
    // ------------------------------------------------------------------

    /// Creates a post through the API and returns the response body.
    pub async fn create_post(&self, wallet: &str, content: &str) -> Value {
        let resp = self
            .post_json(
                "/posts",
                serde_json::json!({ "content": content }),
                Some(wallet),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "create_post failed");
        resp.json()
    }
}

/// Router over an arbitrary store, for the fakes below.
pub fn router_with(store: impl Store + 'static) -> Router {
    murmur::http::router(AppState::new(Arc::new(store)))
}

// ---------------------------------------------------------------------------
// Fake stores
// ---------------------------------------------------------------------------

/// Serves a fixed list of posts in the given order. Writes fail.
pub struct FixedStore {
    pub posts: Vec<Post>,
}

#[async_trait]
impl Store for FixedStore {
    async fn list_posts(&self) -> anyhow::Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    async fn get_post(&self, id: u64) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn insert_post(&self, _post: NewPost) -> anyhow::Result<Post> {
        Err(anyhow!("read only"))
    }

    async fn toggle_like(&self, _id: u64, _wallet: &str) -> anyhow::Result<Option<Post>> {
        Err(anyhow!("read only"))
    }

    async fn append_comment(&self, _id: u64, _comment: NewComment) -> anyhow::Result<Option<Post>> {
        Err(anyhow!("read only"))
    }

    async fn get_user(&self, _wallet: &str) -> anyhow::Result<Option<User>> {
        Ok(None)
    }

    async fn put_user(&self, _user: User) -> anyhow::Result<User> {
        Err(anyhow!("read only"))
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(Vec::new())
    }
}

/// Every call fails, as an unreachable backend would.
pub struct FailingStore;

#[async_trait]
impl Store for FailingStore {
    async fn list_posts(&self) -> anyhow::Result<Vec<Post>> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_post(&self, _id: u64) -> anyhow::Result<Option<Post>> {
        Err(anyhow!("store unavailable"))
    }

    async fn insert_post(&self, _post: NewPost) -> anyhow::Result<Post> {
        Err(anyhow!("store unavailable"))
    }

    async fn toggle_like(&self, _id: u64, _wallet: &str) -> anyhow::Result<Option<Post>> {
        Err(anyhow!("store unavailable"))
    }

    async fn append_comment(&self, _id: u64, _comment: NewComment) -> anyhow::Result<Option<Post>> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_user(&self, _wallet: &str) -> anyhow::Result<Option<User>> {
        Err(anyhow!("store unavailable"))
    }

    async fn put_user(&self, _user: User) -> anyhow::Result<User> {
        Err(anyhow!("store unavailable"))
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        Err(anyhow!("store unavailable"))
    }
}

/// Sends a request with an optional JSON body to `router`.
pub async fn call(
    router: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(path);
    for &(key, value) in headers {
        builder = builder.header(key, value);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(router, request).await
}
