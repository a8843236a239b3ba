use anyhow::anyhow;
use axum::http::Method;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use murmur::config::AppConfig;
use murmur::infra::store::InMemoryStore;
use murmur::proxy::{self, ProxyState};
use murmur::{http, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let (app, methods): (Router, &[Method]) = match config.app_mode.as_str() {
        "api" => {
            let state = AppState::new(Arc::new(InMemoryStore::new()));
            (http::router(state), http::API_METHODS)
        }
        "proxy" => {
            tracing::info!(origin = %config.backend_origin, "proxying /api to backend");
            let state = ProxyState::new(
                config.backend_origin.clone(),
                Duration::from_secs(config.proxy_timeout_seconds),
            )?;
            (proxy::router(state), proxy::PROXY_METHODS)
        }
        other => return Err(anyhow!("unknown APP_MODE: {}", other)),
    };

    let app = http::with_layers(
        app,
        config.cors_allow_origin.as_deref(),
        methods,
        config.request_body_limit_bytes,
    )?;

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(mode = %config.app_mode, "listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
