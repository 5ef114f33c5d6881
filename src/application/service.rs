//! Boundary to the remote posts collection.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostDraft, PostId};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ServiceError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }
}

/// Remote operations on the posts collection.
///
/// Each call is a single attempt: no retry, no timeout, no backoff.
#[async_trait]
pub trait PostService: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, ServiceError>;

    /// Returns the server's canonical record, including the assigned id.
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ServiceError>;

    /// Replaces the whole record identified by `post.id`.
    async fn update_post(&self, post: &Post) -> Result<Post, ServiceError>;

    /// Resolves to the id that was deleted; no response body is read.
    async fn delete_post(&self, id: &PostId) -> Result<PostId, ServiceError>;
}
