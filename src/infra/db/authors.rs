use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{AuthorsRepo, RepoError};
use crate::domain::entities::AuthorRecord;

use super::types::AuthorRow;
use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl AuthorsRepo for PostgresRepositories {
    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, username, first_name, last_name, is_staff, is_superuser, created_at \
             FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AuthorRecord::from))
    }
}
