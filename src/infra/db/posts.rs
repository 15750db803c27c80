use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PostListScope, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams,
};
use crate::domain::entities::{PostRecord, PostWithAuthor};

use super::types::{POST_AUTHOR_COLUMNS, PostAuthorRow, PostRow};
use super::{PostgresRepositories, map_sqlx_error};

const POST_RETURNING: &str =
    "RETURNING id, slug, title, content, image, draft, publish, author_id, created_at, updated_at";

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {POST_AUTHOR_COLUMNS} \
             FROM posts p INNER JOIN authors a ON a.id = p.author_id WHERE 1=1 "
        ));

        Self::apply_scope_conditions(&mut qb, scope);
        Self::apply_search_filter(&mut qb, filter);

        qb.push(" ORDER BY p.created_at, p.id LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_as::<PostAuthorRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn count_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
    ) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM posts p INNER JOIN authors a ON a.id = p.author_id WHERE 1=1 ",
        );
        Self::apply_scope_conditions(&mut qb, scope);
        Self::apply_search_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>, RepoError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {POST_AUTHOR_COLUMNS} \
             FROM posts p INNER JOIN authors a ON a.id = p.author_id WHERE p.slug = "
        ));
        qb.push_bind(slug);

        let row = qb
            .build_query_as::<PostAuthorRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostWithAuthor::from))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            slug,
            title,
            content,
            image,
            draft,
            publish,
            author_id,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (id, slug, title, content, image, draft, publish, author_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) {POST_RETURNING}"
        ))
        .bind(id)
        .bind(slug)
        .bind(title)
        .bind(content)
        .bind(image)
        .bind(draft)
        .bind(publish)
        .bind(author_id)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            content,
            image,
            draft,
            publish,
        } = params;

        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts SET title = $2, content = $3, image = $4, draft = $5, \
             publish = $6, updated_at = $7 WHERE id = $1 {POST_RETURNING}"
        ))
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(image)
        .bind(draft)
        .bind(publish)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
