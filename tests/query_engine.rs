//! Service-level behavior of the post query engine and mutation gate.

mod support;

use time::{Duration, OffsetDateTime};

use foglio::application::posts::{PostInput, PostServiceError};
use foglio::domain::viewer::Viewer;
use support::MemoryRepositories;

fn input(title: &str, content: &str) -> PostInput {
    PostInput {
        title: title.to_string(),
        content: content.to_string(),
        image: None,
        draft: true,
        publish: None,
    }
}

#[tokio::test]
async fn unprivileged_listing_hides_drafts_and_scheduled_posts() {
    let repos = MemoryRepositories::new();
    let author = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let now = OffsetDateTime::now_utc();

    repos.add_post(&author, "Published one", "body", false, now - Duration::days(2));
    repos.add_post(&author, "Published two", "body", false, now - Duration::days(1));
    repos.add_post(&author, "Scheduled", "body", false, now + Duration::days(1));
    repos.add_post(&author, "Draft", "body", true, now);

    let service = support::service(&repos, 10);

    let listing = service
        .list(&Viewer::Anonymous, None, None)
        .await
        .expect("listing");
    let titles: Vec<_> = listing
        .page
        .items
        .iter()
        .map(|entry| entry.post.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Published one", "Published two"]);
    assert!(!listing.privileged);

    let listing = service
        .list(&Viewer::Known(author), None, None)
        .await
        .expect("privileged listing");
    assert_eq!(listing.page.total_items, 4);
    assert!(listing.privileged);
}

#[tokio::test]
async fn five_posts_two_drafts_paginate_as_specified() {
    let repos = MemoryRepositories::new();
    let author = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let now = OffsetDateTime::now_utc();

    for index in 0..3 {
        repos.add_post(
            &author,
            &format!("Visible {index}"),
            "body",
            false,
            now - Duration::days(1),
        );
    }
    repos.add_post(&author, "Draft one", "body", true, now);
    repos.add_post(&author, "Draft two", "body", true, now);

    let service = support::service(&repos, 2);

    let listing = service
        .list(&Viewer::Anonymous, None, Some("1"))
        .await
        .expect("listing");
    assert_eq!(listing.page.items.len(), 2);
    assert_eq!(listing.page.total_items, 3);
    assert_eq!(listing.page.total_pages, 2);
    assert!(!listing.page.has_previous());
    assert!(listing.page.has_next());
}

#[tokio::test]
async fn page_tokens_fall_back_and_clamp() {
    let repos = MemoryRepositories::new();
    let author = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let now = OffsetDateTime::now_utc();

    for index in 0..5 {
        repos.add_post(
            &author,
            &format!("Post {index}"),
            "body",
            false,
            now - Duration::days(1),
        );
    }

    let service = support::service(&repos, 2);
    let viewer = Viewer::Anonymous;

    let listing = service
        .list(&viewer, None, Some("abc"))
        .await
        .expect("listing");
    assert_eq!(listing.page.number, 1);

    let listing = service
        .list(&viewer, None, Some("9999"))
        .await
        .expect("listing");
    assert_eq!(listing.page.number, 3);
    assert_eq!(listing.page.items.len(), 1);

    // An empty result set still reports a single page with no items.
    let listing = service
        .list(&viewer, Some("no such thing"), Some("4"))
        .await
        .expect("listing");
    assert_eq!(listing.page.number, 1);
    assert_eq!(listing.page.total_pages, 1);
    assert!(listing.page.items.is_empty());
}

#[tokio::test]
async fn search_matches_any_field_case_insensitively() {
    let repos = MemoryRepositories::new();
    let ada = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let alan = repos.add_author("alan", "Alan", "Turing", false, false);
    let now = OffsetDateTime::now_utc();
    let published = now - Duration::days(1);

    repos.add_post(&ada, "Engines", "Notes on analytical engines.", false, published);
    repos.add_post(&alan, "Machines", "On computable numbers.", false, published);
    repos.add_post(&ada, "Hidden draft about engines", "engines", true, now);

    let service = support::service(&repos, 10);
    let viewer = Viewer::Anonymous;

    // Title match.
    let listing = service.list(&viewer, Some("ENGINES"), None).await.expect("listing");
    assert_eq!(listing.page.total_items, 1);

    // Content match.
    let listing = service.list(&viewer, Some("computable"), None).await.expect("listing");
    assert_eq!(listing.page.total_items, 1);

    // Author first-name and last-name matches.
    let listing = service.list(&viewer, Some("ada"), None).await.expect("listing");
    assert_eq!(listing.page.total_items, 1);
    let listing = service.list(&viewer, Some("turing"), None).await.expect("listing");
    assert_eq!(listing.page.total_items, 1);

    // OR semantics: a query hitting different fields of different posts
    // returns both.
    let listing = service.list(&viewer, Some("on"), None).await.expect("listing");
    assert_eq!(listing.page.total_items, 2);

    // Draft stays hidden from unprivileged search even when it matches.
    let listing = service
        .list(&Viewer::Known(ada), Some("engines"), None)
        .await
        .expect("privileged listing");
    assert_eq!(listing.page.total_items, 2);
}

#[tokio::test]
async fn draft_detail_is_indistinguishable_from_missing() {
    let repos = MemoryRepositories::new();
    let staff = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let reader = repos.add_author("reader", "Plain", "Reader", false, false);
    let draft = repos.add_post(&staff, "Draft", "body", true, OffsetDateTime::now_utc());

    let service = support::service(&repos, 10);

    assert!(matches!(
        service.get_visible(&draft.slug, &Viewer::Anonymous).await,
        Err(PostServiceError::NotFound)
    ));
    assert!(matches!(
        service.get_visible(&draft.slug, &Viewer::Known(reader)).await,
        Err(PostServiceError::NotFound)
    ));
    assert!(matches!(
        service.get_visible("no-such-slug", &Viewer::Anonymous).await,
        Err(PostServiceError::NotFound)
    ));

    let found = service
        .get_visible(&draft.slug, &Viewer::Known(staff))
        .await
        .expect("privileged read");
    assert_eq!(found.post.id, draft.id);
}

#[tokio::test]
async fn unprivileged_mutations_are_rejected_as_not_found() {
    let repos = MemoryRepositories::new();
    let staff = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let reader = repos.add_author("reader", "Plain", "Reader", false, false);
    let post = repos.add_post(&staff, "Keep me", "body", false, OffsetDateTime::now_utc());

    let service = support::service(&repos, 10);

    for viewer in [Viewer::Anonymous, Viewer::Known(reader)] {
        assert!(matches!(
            service.delete(&viewer, &post.slug).await,
            Err(PostServiceError::NotFound)
        ));
        assert!(matches!(
            service.create(&viewer, input("New", "body")).await,
            Err(PostServiceError::NotFound)
        ));
        assert!(matches!(
            service.update(&viewer, &post.slug, input("New", "body")).await,
            Err(PostServiceError::NotFound)
        ));
    }

    // The post survived every rejected attempt.
    assert!(repos.post_by_slug(&post.slug).is_some());
    assert_eq!(repos.post_count(), 1);
}

#[tokio::test]
async fn create_validates_and_derives_unique_slugs() {
    let repos = MemoryRepositories::new();
    let staff = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let viewer = Viewer::Known(staff);

    let service = support::service(&repos, 10);

    // Blank title: validation failure, nothing persisted.
    let err = service
        .create(&viewer, input("   ", "body"))
        .await
        .expect_err("blank title rejected");
    assert!(matches!(err, PostServiceError::Validation(_)));
    assert_eq!(repos.post_count(), 0);

    let first = service
        .create(&viewer, input("Hello World", "body"))
        .await
        .expect("created");
    assert_eq!(first.slug, "hello-world");
    assert!(first.draft);

    let second = service
        .create(&viewer, input("Hello World", "body"))
        .await
        .expect("created with suffixed slug");
    assert_eq!(second.slug, "hello-world-2");
}

#[tokio::test]
async fn update_keeps_slug_and_ownership() {
    let repos = MemoryRepositories::new();
    let staff = repos.add_author("ada", "Ada", "Lovelace", true, false);
    let post = repos.add_post(&staff, "Original", "body", true, OffsetDateTime::now_utc());
    let viewer = Viewer::Known(staff.clone());

    let service = support::service(&repos, 10);

    let mut changes = input("Renamed Completely", "new body");
    changes.draft = false;
    let updated = service
        .update(&viewer, &post.slug, changes)
        .await
        .expect("updated");

    assert_eq!(updated.slug, post.slug);
    assert_eq!(updated.title, "Renamed Completely");
    assert_eq!(updated.author_id, staff.id);
    assert!(!updated.draft);
}

#[tokio::test]
async fn privileged_delete_removes_the_post() {
    let repos = MemoryRepositories::new();
    let staff = repos.add_author("ada", "Ada", "Lovelace", false, true);
    let post = repos.add_post(&staff, "Doomed", "body", false, OffsetDateTime::now_utc());

    let service = support::service(&repos, 10);

    let deleted = service
        .delete(&Viewer::Known(staff), &post.slug)
        .await
        .expect("deleted");
    assert_eq!(deleted.id, post.id);
    assert_eq!(repos.post_count(), 0);
}
