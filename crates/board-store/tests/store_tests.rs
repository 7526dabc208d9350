//! Store tests — CRUD, population, and schema rules against SQLite.

use board_protocol::{DiscussionParams, Reference};
use board_store::{Populate, SqliteStore, Store, StoreError};
use tempfile::TempDir;

fn params(title: &str, description: &str) -> DiscussionParams {
    DiscussionParams {
        title: Some(title.into()),
        description: Some(description.into()),
        author: None,
        category: Some("general".into()),
        tags: Some(vec!["rust".into(), "web".into()]),
    }
}

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Create
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_persists_fields_verbatim() {
    let s = store();
    let created = s.create(params("Hello", "First post")).await.unwrap();

    let loaded = s.find_by_id(&created.id, Populate::NONE).await.unwrap();
    assert_eq!(loaded.title, "Hello");
    assert_eq!(loaded.description, "First post");
    assert_eq!(loaded.category.as_deref(), Some("general"));
    assert_eq!(loaded.tags, vec!["rust", "web"]);
    assert_eq!(loaded.views, 0);
    assert!(loaded.comments.is_empty());
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn create_rejects_missing_title() {
    let s = store();
    let mut p = params("", "body");
    p.title = None;

    let err = s.create(p).await.unwrap_err();
    assert!(matches!(err, StoreError::Schema(ref msg) if msg.contains("title is required")));
    assert!(s.find_all(Populate::NONE).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_unknown_category() {
    let s = store();
    let mut p = params("T", "D");
    p.category = Some("gossip".into());

    let err = s.create(p).await.unwrap_err();
    assert!(matches!(err, StoreError::Schema(ref msg) if msg.contains("gossip")));
}

#[tokio::test]
async fn create_without_tags_stores_empty_list() {
    let s = store();
    let mut p = params("T", "D");
    p.tags = None;
    p.category = None;

    let created = s.create(p).await.unwrap();
    assert!(created.tags.is_empty());
    assert_eq!(created.category, None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Find and populate
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_all_returns_insertion_order() {
    let s = store();
    for title in ["one", "two", "three"] {
        s.create(params(title, "d")).await.unwrap();
    }
    let titles: Vec<String> = s
        .find_all(Populate::NONE)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.title)
        .collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn populate_resolves_author_and_comments() {
    let s = store();
    let user = s.create_user("Ada", "ada@example.com").await.unwrap();
    let mut p = params("T", "D");
    p.author = Some(user.id.clone());
    let created = s.create(p).await.unwrap();
    let comment = s
        .add_comment(&created.id, Some(&user.id), "Nice")
        .await
        .unwrap();

    let bare = s.find_by_id(&created.id, Populate::NONE).await.unwrap();
    assert_eq!(bare.author, Some(Reference::Id(user.id.clone())));
    assert_eq!(bare.comments, vec![Reference::Id(comment.id.clone())]);

    let full = s.find_by_id(&created.id, Populate::ALL).await.unwrap();
    assert_eq!(full.author, Some(Reference::Populated(user.clone())));
    assert_eq!(full.comments, vec![Reference::Populated(comment)]);

    let listed = s.find_all(Populate::AUTHOR).await.unwrap();
    assert_eq!(listed[0].author_name(), Some("Ada"));
}

#[tokio::test]
async fn dangling_author_stays_a_bare_id() {
    let s = store();
    let mut p = params("T", "D");
    p.author = Some("ghost".into());
    let created = s.create(p).await.unwrap();

    let loaded = s.find_by_id(&created.id, Populate::ALL).await.unwrap();
    assert_eq!(loaded.author, Some(Reference::Id("ghost".into())));
}

#[tokio::test]
async fn find_by_id_missing_is_not_found() {
    let s = store();
    let id = uuid_like();
    let err = s.find_by_id(&id, Populate::ALL).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn find_by_id_malformed_is_invalid_id() {
    let s = store();
    let err = s.find_by_id("not-an-id", Populate::NONE).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidId(_)));
    assert!(err.is_not_found());
}

// ─────────────────────────────────────────────────────────────────────────────
// Update
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_sets_only_submitted_fields() {
    let s = store();
    let user = s.create_user("Ada", "ada@example.com").await.unwrap();
    let mut p = params("T1", "D1");
    p.author = Some(user.id.clone());
    let created = s.create(p).await.unwrap();

    let patch = DiscussionParams {
        title: Some("T2".into()),
        ..Default::default()
    };
    let updated = s
        .find_by_id_and_update(&created.id, patch, Populate::AUTHOR)
        .await
        .unwrap();
    assert_eq!(updated.title, "T2");
    assert_eq!(updated.author_name(), Some("Ada"));

    let loaded = s.find_by_id(&created.id, Populate::NONE).await.unwrap();
    assert_eq!(loaded.title, "T2");
    assert_eq!(loaded.description, created.description);
    assert_eq!(loaded.category, created.category);
    assert_eq!(loaded.tags, created.tags);
    assert_eq!(loaded.author, created.author);
    assert_eq!(loaded.views, created.views);
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let s = store();
    let err = s
        .find_by_id_and_update(&uuid_like(), params("T", "D"), Populate::NONE)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn save_views_writes_the_count() {
    let s = store();
    let created = s.create(params("T", "D")).await.unwrap();
    s.save_views(&created.id, 7).await.unwrap();
    assert_eq!(s.find_by_id(&created.id, Populate::NONE).await.unwrap().views, 7);
}

// ─────────────────────────────────────────────────────────────────────────────
// Remove
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_deletes_discussion_and_comments() {
    let s = store();
    let created = s.create(params("T", "D")).await.unwrap();
    s.add_comment(&created.id, None, "bye").await.unwrap();

    let removed = s.find_by_id_and_remove(&created.id).await.unwrap();
    assert_eq!(removed.map(|d| d.id), Some(created.id.clone()));

    let err = s.find_by_id(&created.id, Populate::NONE).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn remove_missing_is_none() {
    let s = store();
    assert!(s.find_by_id_and_remove(&uuid_like()).await.unwrap().is_none());
}

#[tokio::test]
async fn comment_on_missing_discussion_fails() {
    let s = store();
    let err = s.add_comment(&uuid_like(), None, "hi").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn on_disk_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/board.db");

    let id = {
        let s = SqliteStore::open(&path).unwrap();
        s.create(params("Persisted", "D")).await.unwrap().id
    };

    let s = SqliteStore::open(&path).unwrap();
    let loaded = s.find_by_id(&id, Populate::NONE).await.unwrap();
    assert_eq!(loaded.title, "Persisted");
}

fn uuid_like() -> String {
    "00000000-0000-4000-8000-000000000000".to_string()
}
