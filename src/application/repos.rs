//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, PostRecord, PostWithAuthor};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Which posts a listing query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListScope {
    /// Non-draft posts whose publish time has elapsed.
    Public,
    /// Everything, drafts and scheduled posts included.
    Privileged,
}

#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    pub search: Option<String>,
}

/// Fully-resolved insert parameters; the service has already derived the
/// slug and defaulted `draft`/`publish`.
#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub draft: bool,
    pub publish: OffsetDateTime,
    pub author_id: Uuid,
}

/// Update parameters. The slug is stable across updates and ownership never
/// transfers, so neither appears here.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub draft: bool,
    pub publish: OffsetDateTime,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// List posts in storage order (`created_at`, then id) within the scope,
    /// optionally narrowed by the free-text filter.
    async fn list_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<PostWithAuthor>, RepoError>;

    async fn count_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
    ) -> Result<u64, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuthorsRepo: Send + Sync {
    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    /// Cheap liveness probe against the backing store.
    async fn ping(&self) -> Result<(), RepoError>;
}
