use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, PostRecord, PostWithAuthor};

/// Column list shared by every post/author join. Field names line up with
/// [`PostAuthorRow`]; keep the two in step.
pub(crate) const POST_AUTHOR_COLUMNS: &str = "p.id, p.slug, p.title, p.content, p.image, \
     p.draft, p.publish, p.author_id, p.created_at, p.updated_at, \
     a.username, a.first_name, a.last_name, a.is_staff, a.is_superuser, \
     a.created_at AS author_created_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PostAuthorRow {
    pub(crate) id: Uuid,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) draft: bool,
    pub(crate) publish: OffsetDateTime,
    pub(crate) author_id: Uuid,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) is_staff: bool,
    pub(crate) is_superuser: bool,
    pub(crate) author_created_at: OffsetDateTime,
}

impl From<PostAuthorRow> for PostWithAuthor {
    fn from(row: PostAuthorRow) -> Self {
        Self {
            post: PostRecord {
                id: row.id,
                slug: row.slug,
                title: row.title,
                content: row.content,
                image: row.image,
                draft: row.draft,
                publish: row.publish,
                author_id: row.author_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            author: AuthorRecord {
                id: row.author_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                is_staff: row.is_staff,
                is_superuser: row.is_superuser,
                created_at: row.author_created_at,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) draft: bool,
    pub(crate) publish: OffsetDateTime,
    pub(crate) author_id: Uuid,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            image: row.image,
            draft: row.draft,
            publish: row.publish,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuthorRow {
    pub(crate) id: Uuid,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) is_staff: bool,
    pub(crate) is_superuser: bool,
    pub(crate) created_at: OffsetDateTime,
}

impl From<AuthorRow> for AuthorRecord {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
        }
    }
}
