use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::engagement::Comment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub content: String,
    pub wallet_address: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Wallets that currently like the post, in the order they liked it.
    /// A wallet appears at most once.
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_liked_by(&self, wallet: &str) -> bool {
        self.likes.iter().any(|liker| liker == wallet)
    }
}

/// A post before the store has assigned its id and timestamp.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub wallet_address: String,
    pub content: String,
}
