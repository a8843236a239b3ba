//! Passthrough from `/api/{*path}` to a backend origin.
//!
//! The backend's status and JSON body are relayed unchanged. When the
//! backend cannot be reached, or does not answer with JSON, the caller gets
//! a 500 with a fixed message for the verb.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use url::Url;

use crate::http::{AppError, WALLET_HEADER};

/// Methods forwarded by [`router`].
pub const PROXY_METHODS: &[Method] = &[Method::GET, Method::POST, Method::DELETE];

#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    origin: Url,
}

impl ProxyState {
    pub fn new(origin: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, origin })
    }

    /// Rebuilds the backend URL from the raw inbound URI, so percent
    /// escapes in the path reach the backend unchanged.
    fn target(&self, uri: &Uri, keep_query: bool) -> String {
        let base = self.origin.as_str().trim_end_matches('/');
        let path = uri.path().strip_prefix("/api/").unwrap_or_default();
        let query = uri.query().filter(|query| keep_query && !query.is_empty());
        match query {
            Some(query) => format!("{}/{}?{}", base, path, query),
            None => format!("{}/{}", base, path),
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(
            "/api/*path",
            get(forward_get).post(forward_post).delete(forward_delete),
        )
        .with_state(state)
}

async fn forward_get(
    State(state): State<ProxyState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let url = state.target(&uri, true);
    forward(&state, Method::GET, url, &headers, None, "Failed to fetch data").await
}

async fn forward_post(
    State(state): State<ProxyState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(_) => return AppError::bad_request("invalid JSON body").into_response(),
        }
    };

    let url = state.target(&uri, false);
    forward(&state, Method::POST, url, &headers, body, "Failed to create data").await
}

async fn forward_delete(
    State(state): State<ProxyState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let url = state.target(&uri, false);
    forward(&state, Method::DELETE, url, &headers, None, "Failed to delete data").await
}

async fn forward(
    state: &ProxyState,
    method: Method,
    url: String,
    inbound: &HeaderMap,
    body: Option<Value>,
    failure: &'static str,
) -> Response {
    let mut request = state
        .client
        .request(method.clone(), &url)
        .header(header::CONTENT_TYPE, "application/json");
    for name in [header::AUTHORIZATION, WALLET_HEADER] {
        if let Some(value) = inbound.get(&name) {
            request = request.header(name, value.clone());
        }
    }
    if let Some(body) = body {
        request = request.json(&body);
    }

    let result = async {
        let response = request.send().await?;
        let status = response.status();
        let data = response.json::<Value>().await?;
        Ok::<_, reqwest::Error>((status, data))
    }
    .await;

    match result {
        Ok((status, data)) => (status, Json(data)).into_response(),
        Err(err) => {
            tracing::error!(error = ?err, method = %method, url = %url, "proxy request failed");
            AppError::internal(failure).into_response()
        }
    }
}
