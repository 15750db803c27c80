use metrics::counter;
use time::OffsetDateTime;
use tracing::info;

use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::entities::{AuthorRecord, PostRecord};
use crate::domain::slug::{SlugError, SlugLookupError, generate_unique_slug};
use crate::domain::viewer::Viewer;

use super::service::PostService;
use super::types::{FieldErrors, PostInput, PostServiceError, validate};

impl PostService {
    /// Create a post owned by the acting author.
    pub async fn create(
        &self,
        viewer: &Viewer,
        input: PostInput,
    ) -> Result<PostRecord, PostServiceError> {
        let author = require_privileged_author(viewer)?;
        validate(&input)?;

        let reader = self.reader.clone();
        let slug = match generate_unique_slug(&input.title, move |candidate| {
            let reader = reader.clone();
            async move { reader.slug_exists(&candidate).await.map(|taken| !taken) }
        })
        .await
        {
            Ok(slug) => slug,
            Err(SlugLookupError::Slug(SlugError::Exhausted { .. })) => {
                return Err(PostServiceError::Conflict {
                    constraint: "posts_slug_key".to_string(),
                });
            }
            Err(SlugLookupError::Slug(_)) => {
                let mut errors = FieldErrors::default();
                errors.push("title", "Title cannot be turned into a web address.");
                return Err(PostServiceError::Validation(errors));
            }
            Err(SlugLookupError::Predicate(err)) => return Err(err.into()),
        };

        let params = CreatePostParams {
            slug,
            title: input.title,
            content: input.content,
            image: input.image,
            draft: input.draft,
            publish: input.publish.unwrap_or_else(OffsetDateTime::now_utc),
            author_id: author.id,
        };

        let post = self.writer.create_post(params).await?;

        counter!("foglio_posts_created_total").increment(1);
        info!(target: "foglio::posts", slug = %post.slug, "post created");

        Ok(post)
    }

    /// Update a post in place. The slug stays stable so shared links keep
    /// working, and ownership never transfers.
    pub async fn update(
        &self,
        viewer: &Viewer,
        slug: &str,
        input: PostInput,
    ) -> Result<PostRecord, PostServiceError> {
        require_privileged_author(viewer)?;

        let existing = self
            .reader
            .find_by_slug(slug)
            .await?
            .ok_or(PostServiceError::NotFound)?;
        validate(&input)?;

        let params = UpdatePostParams {
            id: existing.post.id,
            title: input.title,
            content: input.content,
            image: input.image,
            draft: input.draft,
            publish: input.publish.unwrap_or(existing.post.publish),
        };

        let post = self.writer.update_post(params).await?;

        counter!("foglio_posts_updated_total").increment(1);
        info!(target: "foglio::posts", slug = %post.slug, "post updated");

        Ok(post)
    }

    /// Hard-delete a post. Irreversible; returns the deleted record so the
    /// caller can report what went away.
    pub async fn delete(
        &self,
        viewer: &Viewer,
        slug: &str,
    ) -> Result<PostRecord, PostServiceError> {
        require_privileged_author(viewer)?;

        let existing = self
            .reader
            .find_by_slug(slug)
            .await?
            .ok_or(PostServiceError::NotFound)?;

        self.writer.delete_post(existing.post.id).await?;

        counter!("foglio_posts_deleted_total").increment(1);
        info!(target: "foglio::posts", slug = %existing.post.slug, "post deleted");

        Ok(existing.post)
    }
}

/// The mutation gate. Failure is reported as `NotFound`, indistinguishable
/// from a missing resource, so unauthorized probing reveals nothing.
fn require_privileged_author(viewer: &Viewer) -> Result<&AuthorRecord, PostServiceError> {
    match viewer.author() {
        Some(author) if viewer.is_privileged() => Ok(author),
        _ => Err(PostServiceError::NotFound),
    }
}
