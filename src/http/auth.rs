use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;

use crate::http::error::AUTH_REQUIRED;
use crate::http::AppError;

/// Header carrying the caller's wallet address. Trusted as-is.
pub const WALLET_HEADER: HeaderName = HeaderName::from_static("x-wallet-address");

/// Wallet identity of the caller, taken from `X-Wallet-Address`.
#[derive(Debug, Clone)]
pub struct WalletIdentity {
    pub wallet_address: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for WalletIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let wallet = parts
            .headers
            .get(WALLET_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))?;

        Ok(WalletIdentity {
            wallet_address: wallet.to_string(),
        })
    }
}
