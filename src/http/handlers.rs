use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::posts::PostService;
use crate::app::users::UserService;
use crate::domain::post::Post;
use crate::domain::user::{ProfileFields, User};
use crate::http::extract::{JsonBody, Path, Query};
use crate::http::{AppError, WalletIdentity};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Deserialize)]
pub struct ListPostsQuery {
    pub wallet: Option<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    let service = PostService::new(state.store.clone());
    let posts = service
        .list_posts(query.wallet.as_deref())
        .await
        .map_err(|err| AppError::from_post(err, "failed to list posts"))?;

    Ok(Json(posts))
}

pub async fn get_post(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Post>, AppError> {
    let service = PostService::new(state.store.clone());
    let post = service
        .get_post(id)
        .await
        .map_err(|err| AppError::from_post(err, "failed to fetch post"))?;

    Ok(Json(post))
}

/// `content` is optional here so a missing field gets the same 400 as an
/// empty one.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

pub async fn create_post(
    identity: WalletIdentity,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ContentRequest>,
) -> Result<Json<Post>, AppError> {
    let content = payload.content.unwrap_or_default();

    let service = PostService::new(state.store.clone());
    let post = service
        .create_post(&identity.wallet_address, &content)
        .await
        .map_err(|err| AppError::from_post(err, "failed to create post"))?;

    Ok(Json(post))
}

pub async fn toggle_like(
    Path(id): Path<u64>,
    identity: WalletIdentity,
    State(state): State<AppState>,
) -> Result<Json<Post>, AppError> {
    let service = PostService::new(state.store.clone());
    let post = service
        .toggle_like(id, &identity.wallet_address)
        .await
        .map_err(|err| AppError::from_post(err, "failed to like post"))?;

    Ok(Json(post))
}

pub async fn comment_post(
    Path(id): Path<u64>,
    identity: WalletIdentity,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ContentRequest>,
) -> Result<Json<Post>, AppError> {
    let content = payload.content.unwrap_or_default();

    let service = PostService::new(state.store.clone());
    let post = service
        .add_comment(id, &identity.wallet_address, &content)
        .await
        .map_err(|err| AppError::from_post(err, "failed to comment"))?;

    Ok(Json(post))
}

pub async fn get_user(
    Path(wallet): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.store.clone());
    let user = service
        .get_profile(&wallet)
        .await
        .map_err(|err| AppError::from_user(err, "failed to fetch user"))?;

    Ok(Json(user))
}

pub async fn upsert_profile(
    Path(wallet): Path<String>,
    identity: WalletIdentity,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProfileFields>,
) -> Result<Json<User>, AppError> {
    if identity.wallet_address != wallet {
        return Err(AppError::forbidden("cannot update other users"));
    }

    let service = UserService::new(state.store.clone());
    let user = service
        .upsert_profile(&wallet, payload)
        .await
        .map_err(|err| AppError::from_user(err, "failed to update profile"))?;

    Ok(Json(user))
}
