use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/posts/:id", get(handlers::get_post))
        .route("/posts/:id/likes", post(handlers::toggle_like))
        .route("/posts/:id/comments", post(handlers::comment_post))
}

pub fn users() -> Router<AppState> {
    Router::new().route(
        "/users/:wallet",
        get(handlers::get_user).post(handlers::upsert_profile),
    )
}
