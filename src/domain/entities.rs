use time::OffsetDateTime;
use uuid::Uuid;

/// A stored blog post. `draft` posts are visible to privileged viewers only;
/// everyone else additionally requires `publish` to have elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub draft: bool,
    pub publish: OffsetDateTime,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The identity collaborator's account record. Foglio only ever reads these;
/// account management lives elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: OffsetDateTime,
}

impl AuthorRecord {
    /// Human-readable byline: full name when present, username otherwise.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// A post joined with its author, the unit the listing and detail views
/// operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct PostWithAuthor {
    pub post: PostRecord,
    pub author: AuthorRecord,
}
