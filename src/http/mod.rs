use anyhow::anyhow;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

mod auth;
mod error;
mod extract;
mod handlers;
mod routes;

pub use auth::{WalletIdentity, WALLET_HEADER};
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::posts())
        .merge(routes::users())
        .with_state(state)
}

/// Methods served by [`router`].
pub const API_METHODS: &[Method] = &[Method::GET, Method::POST];

/// Browser access for the front end. `None` allows any origin. `methods`
/// is the set the wrapped router serves; the proxy adds `DELETE`.
pub fn cors_layer(allowed_origin: Option<&str>, methods: &[Method]) -> anyhow::Result<CorsLayer> {
    let origin = match allowed_origin {
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .map_err(|err| anyhow!("invalid CORS_ALLOW_ORIGIN: {}", err))?;
            AllowOrigin::exact(value)
        }
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods.to_vec())
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, WALLET_HEADER]))
}

/// Body limit innermost, then CORS, then tracing. `Cors` needs a response
/// body that implements `Default`, so each layer is applied separately.
pub fn with_layers(
    router: Router,
    allowed_origin: Option<&str>,
    methods: &[Method],
    body_limit_bytes: usize,
) -> anyhow::Result<Router> {
    Ok(router
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(cors_layer(allowed_origin, methods)?)
        .layer(TraceLayer::new_for_http()))
}
