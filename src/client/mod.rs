//! HTTP client for the posting API.
//!
//! Every call goes through the same steps: attach the caller's wallet when
//! the route needs one, dispatch, then classify any failure into a
//! [`ClientError`]. A timed out call is sent again exactly once; if that
//! second attempt fails too the caller gets [`ClientError::RetryExhausted`].
//!
//! The wallet identity is an explicit argument of each call. The client
//! holds no per-user state, so one instance can serve many callers.

pub mod error;
pub mod routes;
pub mod transport;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::config::env_or_parse;
use crate::domain::post::Post;
use crate::domain::user::{ProfileFields, User};
use crate::http::WALLET_HEADER;

pub use error::ClientError;
pub use routes::{default_auth_routes, AuthRoute};
pub use transport::{HttpTransport, OutboundRequest, Transport, TransportError, TransportResponse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Applies to each transport attempt, not the whole call.
    pub timeout: Duration,
    pub auth_routes: Vec<AuthRoute>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            auth_routes: default_auth_routes(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let base_url: Url = env_or_parse("API_BASE_URL", "http://localhost:8080")?;
        let timeout_ms: u64 = env_or_parse("API_TIMEOUT_MS", "10000")?;

        Ok(Self {
            timeout: Duration::from_millis(timeout_ms),
            ..Self::new(base_url)
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

pub struct ResilientClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
    auth_routes: Vec<AuthRoute>,
}

impl ResilientClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ResilientClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base_url,
            auth_routes: config.auth_routes,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn requires_auth(&self, method: &Method, path: &str) -> bool {
        self.auth_routes
            .iter()
            .any(|route| route.matches(method, path))
    }

    pub async fn send(
        &self,
        request: ApiRequest,
        identity: Option<&str>,
    ) -> Result<TransportResponse, ClientError> {
        let outbound = self.build(request, identity)?;

        match self.attempt(&outbound).await {
            Err(ClientError::Timeout) => {
                tracing::warn!(
                    method = %outbound.method,
                    url = %outbound.url,
                    "request timed out, retrying once"
                );
                self.attempt(&outbound).await.map_err(|err| {
                    tracing::warn!(
                        error = ?err,
                        method = %outbound.method,
                        url = %outbound.url,
                        "retry failed"
                    );
                    ClientError::RetryExhausted
                })
            }
            result => result,
        }
    }

    pub async fn send_json<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        identity: Option<&str>,
    ) -> Result<R, ClientError> {
        let response = self.send(request, identity).await?;
        serde_json::from_slice(&response.body).map_err(|err| {
            tracing::warn!(error = %err, status = %response.status, "undecodable response body");
            ClientError::Other {
                status: Some(response.status),
                message: "Unexpected response from server".to_string(),
            }
        })
    }

    pub async fn list_posts(&self, wallet: Option<&str>) -> Result<Vec<Post>, ClientError> {
        let mut request = ApiRequest::get("/posts");
        if let Some(wallet) = wallet {
            request = request.query("wallet", wallet);
        }
        self.send_json(request, None).await
    }

    pub async fn get_post(&self, post_id: u64) -> Result<Post, ClientError> {
        self.send_json(ApiRequest::get(format!("/posts/{post_id}")), None)
            .await
    }

    pub async fn create_post(
        &self,
        identity: Option<&str>,
        content: &str,
    ) -> Result<Post, ClientError> {
        let request = ApiRequest::post("/posts").json(json!({ "content": content }));
        self.send_json(request, identity).await
    }

    pub async fn toggle_like(
        &self,
        identity: Option<&str>,
        post_id: u64,
    ) -> Result<Post, ClientError> {
        let request = ApiRequest::post(format!("/posts/{post_id}/likes"));
        self.send_json(request, identity).await
    }

    pub async fn add_comment(
        &self,
        identity: Option<&str>,
        post_id: u64,
        content: &str,
    ) -> Result<Post, ClientError> {
        let request = ApiRequest::post(format!("/posts/{post_id}/comments"))
            .json(json!({ "content": content }));
        self.send_json(request, identity).await
    }

    pub async fn get_profile(&self, wallet: &str) -> Result<User, ClientError> {
        self.send_json(ApiRequest::get(format!("/users/{wallet}")), None)
            .await
    }

    pub async fn upsert_profile(
        &self,
        identity: Option<&str>,
        wallet: &str,
        fields: &ProfileFields,
    ) -> Result<User, ClientError> {
        let body = serde_json::to_value(fields).map_err(|err| ClientError::Other {
            status: None,
            message: format!("invalid profile: {err}"),
        })?;
        let request = ApiRequest::post(format!("/users/{wallet}")).json(body);
        self.send_json(request, identity).await
    }

    fn build(
        &self,
        request: ApiRequest,
        identity: Option<&str>,
    ) -> Result<OutboundRequest, ClientError> {
        let mut headers = HeaderMap::new();
        if self.requires_auth(&request.method, &request.path) {
            let wallet = identity
                .filter(|wallet| !wallet.is_empty())
                .ok_or(ClientError::NotConnected)?;
            let value = HeaderValue::from_str(wallet).map_err(|_| {
                tracing::warn!("wallet address is not a valid header value");
                ClientError::NotConnected
            })?;
            headers.insert(WALLET_HEADER, value);
        }

        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|err| ClientError::Other {
            status: None,
            message: format!("invalid request path: {err}"),
        })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        Ok(OutboundRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
        })
    }

    async fn attempt(&self, request: &OutboundRequest) -> Result<TransportResponse, ClientError> {
        match self.transport.dispatch(request).await {
            Ok(response) if response.status.is_success() => Ok(response),
            Ok(response) => Err(ClientError::from_response(&response)),
            Err(err) => Err(ClientError::from_transport(err)),
        }
    }
}
