use std::sync::Arc;

use crate::domain::engagement::NewComment;
use crate::domain::post::{NewPost, Post};
use crate::infra::store::Store;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type PostResult<T> = Result<T, PostError>;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn Store>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Most recent first. Posts created within the same instant are ordered
    /// by id, newest first.
    pub async fn list_posts(&self, filter_wallet: Option<&str>) -> PostResult<Vec<Post>> {
        let mut posts = self.store.list_posts().await?;

        if let Some(wallet) = filter_wallet.filter(|wallet| !wallet.is_empty()) {
            posts.retain(|post| post.wallet_address == wallet);
        }

        posts.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(posts)
    }

    pub async fn get_post(&self, post_id: u64) -> PostResult<Post> {
        self.store
            .get_post(post_id)
            .await?
            .ok_or(PostError::NotFound)
    }

    pub async fn create_post(&self, author_wallet: &str, content: &str) -> PostResult<Post> {
        if author_wallet.is_empty() {
            return Err(PostError::Unauthenticated);
        }
        if content.trim().is_empty() {
            return Err(PostError::InvalidInput("Post content is required"));
        }

        let post = self
            .store
            .insert_post(NewPost {
                wallet_address: author_wallet.to_string(),
                content: content.to_string(),
            })
            .await?;

        tracing::info!(post_id = post.id, wallet = %post.wallet_address, "post created");
        Ok(post)
    }

    /// Each call flips the wallet's like. Inspect the returned post to learn
    /// whether the wallet now likes it.
    pub async fn toggle_like(&self, post_id: u64, wallet: &str) -> PostResult<Post> {
        if wallet.is_empty() {
            return Err(PostError::Unauthenticated);
        }

        let post = self
            .store
            .toggle_like(post_id, wallet)
            .await?
            .ok_or(PostError::NotFound)?;

        tracing::debug!(
            post_id,
            wallet = %wallet,
            liked = post.is_liked_by(wallet),
            "like toggled"
        );
        Ok(post)
    }

    pub async fn add_comment(
        &self,
        post_id: u64,
        wallet: &str,
        content: &str,
    ) -> PostResult<Post> {
        if wallet.is_empty() {
            return Err(PostError::Unauthenticated);
        }
        if content.trim().is_empty() {
            return Err(PostError::InvalidInput("Comment content is required"));
        }

        let post = self
            .store
            .append_comment(
                post_id,
                NewComment {
                    wallet_address: wallet.to_string(),
                    content: content.to_string(),
                },
            )
            .await?
            .ok_or(PostError::NotFound)?;

        Ok(post)
    }
}
