use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::transport::{TransportError, TransportResponse};

/// Failures as seen by callers. Messages are fixed; the underlying cause is
/// only logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Wallet not connected")]
    NotConnected,
    #[error("Network error. Please check your connection.")]
    NetworkError,
    #[error("Authentication required. Please connect your wallet.")]
    Unauthenticated,
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Server error. Please try again later.")]
    ServerError,
    #[error("Request timed out.")]
    Timeout,
    #[error("Request failed after retry. Please try again later.")]
    RetryExhausted,
    #[error("{message}")]
    Other {
        status: Option<StatusCode>,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    /// Classifies a non-success response.
    pub fn from_response(response: &TransportResponse) -> Self {
        let status = response.status;
        tracing::warn!(
            status = %status,
            body = %String::from_utf8_lossy(&response.body),
            "request failed"
        );

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthenticated,
            StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
            StatusCode::REQUEST_TIMEOUT => ClientError::Timeout,
            s if s.is_server_error() => ClientError::ServerError,
            s => {
                let message = serde_json::from_slice::<ErrorBody>(&response.body)
                    .map(|body| body.error)
                    .unwrap_or_else(|_| {
                        s.canonical_reason().unwrap_or("Request failed").to_string()
                    });
                ClientError::Other {
                    status: Some(s),
                    message,
                }
            }
        }
    }

    pub fn from_transport(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => {
                tracing::warn!("request timed out");
                ClientError::Timeout
            }
            TransportError::NoResponse(cause) => {
                tracing::warn!(error = %cause, "network error");
                ClientError::NetworkError
            }
        }
    }
}
