use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::engagement::{Comment, NewComment};
use crate::domain::post::{NewPost, Post};
use crate::domain::user::User;

/// Backing store for posts and profiles.
///
/// Each mutating method is a single atomic unit: id allocation and the
/// change to the post happen together or not at all. Methods that address a
/// post by id return `Ok(None)` when it does not exist and leave every
/// counter untouched.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn get_post(&self, id: u64) -> Result<Option<Post>>;

    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    /// Adds `wallet` to the post's likes, or removes it if already present.
    async fn toggle_like(&self, id: u64, wallet: &str) -> Result<Option<Post>>;

    async fn append_comment(&self, id: u64, comment: NewComment) -> Result<Option<Post>>;

    async fn get_user(&self, wallet: &str) -> Result<Option<User>>;

    async fn put_user(&self, user: User) -> Result<User>;

    async fn list_users(&self) -> Result<Vec<User>>;
}

#[derive(Default)]
struct Collections {
    posts: BTreeMap<u64, Post>,
    users: HashMap<String, User>,
    last_post_id: u64,
    last_comment_id: u64,
}

/// Process-local store. State is lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.values().cloned().collect())
    }

    async fn get_post(&self, id: u64) -> Result<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.get(&id).cloned())
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let mut inner = self.inner.write().await;
        inner.last_post_id += 1;

        let post = Post {
            id: inner.last_post_id,
            content: post.content,
            wallet_address: post.wallet_address,
            timestamp: OffsetDateTime::now_utc(),
            likes: Vec::new(),
            comments: Vec::new(),
        };
        inner.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn toggle_like(&self, id: u64, wallet: &str) -> Result<Option<Post>> {
        let mut inner = self.inner.write().await;
        let Some(post) = inner.posts.get_mut(&id) else {
            return Ok(None);
        };

        match post.likes.iter().position(|liker| liker == wallet) {
            Some(index) => {
                post.likes.remove(index);
            }
            None => post.likes.push(wallet.to_string()),
        }

        Ok(Some(post.clone()))
    }

    async fn append_comment(&self, id: u64, comment: NewComment) -> Result<Option<Post>> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let Some(post) = inner.posts.get_mut(&id) else {
            return Ok(None);
        };

        inner.last_comment_id += 1;
        post.comments.push(Comment {
            id: inner.last_comment_id,
            content: comment.content,
            wallet_address: comment.wallet_address,
            timestamp: OffsetDateTime::now_utc(),
        });

        Ok(Some(post.clone()))
    }

    async fn get_user(&self, wallet: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(wallet).cloned())
    }

    async fn put_user(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write().await;
        inner
            .users
            .insert(user.wallet_address.clone(), user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }
}
