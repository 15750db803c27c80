//! Visibility and search predicates for posts.
//!
//! These are the single source of truth for who sees what. The Postgres
//! repository mirrors them in SQL; the in-memory test repository applies them
//! directly. Keep the three in step when touching any of them.

use time::OffsetDateTime;

use crate::domain::entities::{AuthorRecord, PostRecord};

/// Whether a post appears in a listing for the given privilege level.
///
/// Privileged viewers see everything. Everyone else sees only non-draft
/// posts whose publish time has elapsed.
pub fn is_listed(post: &PostRecord, privileged: bool, now: OffsetDateTime) -> bool {
    privileged || (!post.draft && post.publish <= now)
}

/// Whether a post can be read on its detail page.
///
/// Only the draft flag gates the detail view; a future `publish` does not
/// hide an already-shared link.
pub fn is_readable(post: &PostRecord, privileged: bool) -> bool {
    privileged || !post.draft
}

/// Case-insensitive substring match, OR-combined over title, content and the
/// author's first and last name.
pub fn matches_search(post: &PostRecord, author: &AuthorRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        post.title.as_str(),
        post.content.as_str(),
        author.first_name.as_str(),
        author.last_name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use uuid::Uuid;

    fn post(draft: bool, publish: OffsetDateTime) -> PostRecord {
        let now = OffsetDateTime::now_utc();
        PostRecord {
            id: Uuid::new_v4(),
            slug: "first-post".to_string(),
            title: "First Post".to_string(),
            content: "Some thoughts on borrowing.".to_string(),
            image: None,
            draft,
            publish,
            author_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn author() -> AuthorRecord {
        AuthorRecord {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_staff: true,
            is_superuser: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn drafts_are_listed_for_privileged_only() {
        let now = OffsetDateTime::now_utc();
        let draft = post(true, now);

        assert!(is_listed(&draft, true, now));
        assert!(!is_listed(&draft, false, now));
    }

    #[test]
    fn future_publish_hides_from_unprivileged_listing() {
        let now = OffsetDateTime::now_utc();
        let scheduled = post(false, now + Duration::hours(1));

        assert!(is_listed(&scheduled, true, now));
        assert!(!is_listed(&scheduled, false, now));
    }

    #[test]
    fn detail_gate_only_checks_draft() {
        let now = OffsetDateTime::now_utc();
        let scheduled = post(false, now + Duration::hours(1));
        let draft = post(true, now);

        assert!(is_readable(&scheduled, false));
        assert!(!is_readable(&draft, false));
        assert!(is_readable(&draft, true));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let now = OffsetDateTime::now_utc();
        let record = post(false, now);
        let by = author();

        assert!(matches_search(&record, &by, "FIRST"));
        assert!(matches_search(&record, &by, "borrowing"));
        assert!(matches_search(&record, &by, "ada"));
        assert!(matches_search(&record, &by, "lovelace"));
        assert!(!matches_search(&record, &by, "garbage collector"));
    }
}
