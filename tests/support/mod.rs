//! In-memory repositories backing the integration tests.
//!
//! Filtering applies the same `domain::visibility` predicates the Postgres
//! adapter mirrors in SQL, so service behavior can be exercised without a
//! database.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use foglio::application::pagination::Paginator;
use foglio::application::posts::PostService;
use foglio::application::repos::{
    AuthorsRepo, CreatePostParams, HealthRepo, PostListScope, PostQueryFilter, PostsRepo,
    PostsWriteRepo, RepoError, UpdatePostParams,
};
use foglio::domain::entities::{AuthorRecord, PostRecord, PostWithAuthor};
use foglio::domain::visibility;
use foglio::infra::http::HttpState;

#[derive(Default)]
pub struct MemoryRepositories {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    authors: Vec<AuthorRecord>,
    posts: Vec<PostRecord>,
    sequence: i64,
}

impl MemoryRepositories {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_author(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        is_staff: bool,
        is_superuser: bool,
    ) -> AuthorRecord {
        let author = AuthorRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_staff,
            is_superuser,
            created_at: OffsetDateTime::now_utc(),
        };
        self.inner.lock().unwrap().authors.push(author.clone());
        author
    }

    pub fn add_post(
        &self,
        author: &AuthorRecord,
        title: &str,
        content: &str,
        draft: bool,
        publish: OffsetDateTime,
    ) -> PostRecord {
        let mut inner = self.inner.lock().unwrap();
        inner.sequence += 1;
        // Distinct creation times keep the storage order deterministic.
        let created_at = OffsetDateTime::now_utc() + Duration::microseconds(inner.sequence);

        let slug = foglio::domain::slug::derive_slug(title).expect("sluggable title");
        let slug = if inner.posts.iter().any(|post| post.slug == slug) {
            format!("{slug}-{}", inner.sequence)
        } else {
            slug
        };

        let post = PostRecord {
            id: Uuid::new_v4(),
            slug,
            title: title.to_string(),
            content: content.to_string(),
            image: None,
            draft,
            publish,
            author_id: author.id,
            created_at,
            updated_at: created_at,
        };
        inner.posts.push(post.clone());
        post
    }

    pub fn post_count(&self) -> usize {
        self.inner.lock().unwrap().posts.len()
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<PostRecord> {
        self.inner
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|post| post.slug == slug)
            .cloned()
    }

    fn matching(&self, scope: PostListScope, filter: &PostQueryFilter) -> Vec<PostWithAuthor> {
        let now = OffsetDateTime::now_utc();
        let privileged = matches!(scope, PostListScope::Privileged);
        let inner = self.inner.lock().unwrap();

        let mut entries: Vec<PostWithAuthor> = inner
            .posts
            .iter()
            .filter(|post| visibility::is_listed(post, privileged, now))
            .filter_map(|post| {
                let author = inner
                    .authors
                    .iter()
                    .find(|author| author.id == post.author_id)?;

                match filter.search.as_deref() {
                    Some(query) if !visibility::matches_search(post, author, query) => None,
                    _ => Some(PostWithAuthor {
                        post: post.clone(),
                        author: author.clone(),
                    }),
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            (a.post.created_at, a.post.id).cmp(&(b.post.created_at, b.post.id))
        });
        entries
    }
}

#[async_trait]
impl PostsRepo for MemoryRepositories {
    async fn list_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        Ok(self
            .matching(scope, filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
    ) -> Result<u64, RepoError> {
        Ok(self.matching(scope, filter).len() as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>, RepoError> {
        let inner = self.inner.lock().unwrap();
        let Some(post) = inner.posts.iter().find(|post| post.slug == slug) else {
            return Ok(None);
        };
        let author = inner
            .authors
            .iter()
            .find(|author| author.id == post.author_id)
            .ok_or_else(|| RepoError::from_persistence("post without author"))?;

        Ok(Some(PostWithAuthor {
            post: post.clone(),
            author: author.clone(),
        }))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .posts
            .iter()
            .any(|post| post.slug == slug))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }

        inner.sequence += 1;
        let created_at = OffsetDateTime::now_utc() + Duration::microseconds(inner.sequence);
        let post = PostRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            content: params.content,
            image: params.image,
            draft: params.draft,
            publish: params.publish,
            author_id: params.author_id,
            created_at,
            updated_at: created_at,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let post = inner
            .posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;

        post.title = params.title;
        post.content = params.content;
        post.image = params.image;
        post.draft = params.draft;
        post.publish = params.publish;
        post.updated_at = OffsetDateTime::now_utc();

        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.posts.len();
        inner.posts.retain(|post| post.id != id);

        if inner.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorsRepo for MemoryRepositories {
    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .authors
            .iter()
            .find(|author| author.id == id)
            .cloned())
    }
}

#[async_trait]
impl HealthRepo for MemoryRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

pub fn service(repos: &Arc<MemoryRepositories>, page_size: u32) -> PostService {
    PostService::new(
        repos.clone(),
        repos.clone(),
        Paginator::new(NonZeroU32::new(page_size).expect("nonzero page size")),
    )
}

pub fn http_state(repos: &Arc<MemoryRepositories>, page_size: u32) -> HttpState {
    HttpState {
        posts: Arc::new(service(repos, page_size)),
        authors: repos.clone(),
        health: repos.clone(),
    }
}
