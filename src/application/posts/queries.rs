use crate::application::pagination::{Page, parse_page_token};
use crate::application::repos::{PostListScope, PostQueryFilter};
use crate::domain::entities::PostWithAuthor;
use crate::domain::viewer::Viewer;
use crate::domain::visibility;

use super::service::PostService;
use super::types::PostServiceError;

/// A resolved listing: the page itself plus the request context the view
/// layer needs (normalized search query, whether edit affordances show).
#[derive(Debug, Clone)]
pub struct PostListing {
    pub page: Page<PostWithAuthor>,
    pub search: Option<String>,
    pub privileged: bool,
}

impl PostService {
    /// List posts visible to `viewer`, optionally narrowed by a free-text
    /// query, at the page named by `page_token`.
    ///
    /// Listing never fails on caller input: a blank query is no query, and
    /// bad page tokens fall back per the pagination policy.
    pub async fn list(
        &self,
        viewer: &Viewer,
        search: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<PostListing, PostServiceError> {
        let privileged = viewer.is_privileged();
        let scope = if privileged {
            PostListScope::Privileged
        } else {
            PostListScope::Public
        };

        let search = search
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(ToString::to_string);
        let filter = PostQueryFilter {
            search: search.clone(),
        };

        let total_items = self.reader.count_posts(scope, &filter).await?;
        let window = self
            .paginator
            .locate(parse_page_token(page_token), total_items);
        let items = self
            .reader
            .list_posts(scope, &filter, window.offset, window.limit)
            .await?;

        Ok(PostListing {
            page: Page {
                items,
                number: window.number,
                total_pages: window.total_pages,
                total_items,
            },
            search,
            privileged,
        })
    }

    /// Look up a post by slug for the detail view. Hidden drafts are
    /// reported as missing, not forbidden.
    pub async fn get_visible(
        &self,
        slug: &str,
        viewer: &Viewer,
    ) -> Result<PostWithAuthor, PostServiceError> {
        let found = self
            .reader
            .find_by_slug(slug)
            .await?
            .ok_or(PostServiceError::NotFound)?;

        if !visibility::is_readable(&found.post, viewer.is_privileged()) {
            return Err(PostServiceError::NotFound);
        }

        Ok(found)
    }
}
