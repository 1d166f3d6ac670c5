//! Bookmark repository integration tests.
//!
//! Require a running PostgreSQL instance (see `DEFAULT_TEST_DATABASE_URL`);
//! run with `cargo test -- --ignored`.

use linkshelf_db::test_fixtures::TestDatabase;
use linkshelf_db::{
    BookmarkFilter, BookmarkRepository, CreateBookmarkRequest, UpdateBookmarkRequest,
};

fn new_bookmark(user_id: i32, title: &str, category_ids: Vec<i32>) -> CreateBookmarkRequest {
    CreateBookmarkRequest {
        user_id,
        title: title.to_string(),
        link: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        category_ids,
    }
}

#[tokio::test]
#[ignore]
async fn test_bookmark_without_categories_has_empty_list() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;

    let created = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Lonely", vec![]))
        .await
        .unwrap();

    let fetched = t.db.bookmarks.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.bookmark, created);
    assert!(fetched.categories.is_empty());

    let listed = t.db.bookmarks.list_all().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].categories.is_empty());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_category_ids_create_one_link_each() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let food = t.create_category("Food").await;
    let travel = t.create_category("Travel").await;

    let created = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Street Food", vec![food.id, food.id, travel.id]))
        .await
        .unwrap();

    let fetched = t.db.bookmarks.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.categories, vec!["Food", "Travel"]);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_create_reports_unknown_category_and_keeps_earlier_rows() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let tech = t.create_category("Tech").await;

    let err = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Partial", vec![tech.id, 9999]))
        .await
        .unwrap_err();
    assert!(err.is_foreign_key_violation());

    let stored = t
        .db
        .bookmarks
        .get_by_title("Partial")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.categories, vec!["Tech"]);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_create_atomic_rolls_back_on_bad_category() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let tech = t.create_category("Tech").await;

    let result = t
        .db
        .bookmarks
        .create_atomic(new_bookmark(user.id, "All Or Nothing", vec![tech.id, 9999]))
        .await;
    assert!(result.unwrap_err().is_foreign_key_violation());
    assert!(t
        .db
        .bookmarks
        .get_by_title("All Or Nothing")
        .await
        .unwrap()
        .is_none());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_link_and_unlink_are_idempotent() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let food = t.create_category("Food").await;
    let bm = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Recipes", vec![]))
        .await
        .unwrap();

    t.db.bookmarks.link_category(bm.id, food.id).await.unwrap();
    t.db.bookmarks.link_category(bm.id, food.id).await.unwrap();
    let fetched = t.db.bookmarks.get_by_id(bm.id).await.unwrap().unwrap();
    assert_eq!(fetched.categories, vec!["Food"]);

    t.db.bookmarks.unlink_category(bm.id, food.id).await.unwrap();
    t.db.bookmarks.unlink_category(bm.id, food.id).await.unwrap();
    let fetched = t.db.bookmarks.get_by_id(bm.id).await.unwrap().unwrap();
    assert!(fetched.categories.is_empty());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_partial_update_keeps_other_fields_and_categories() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let travel = t.create_category("Travel").await;
    let bm = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Guide", vec![travel.id]))
        .await
        .unwrap();

    let updated = t
        .db
        .bookmarks
        .update(
            bm.id,
            UpdateBookmarkRequest {
                title: Some("World Guide".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "World Guide");
    assert_eq!(updated.link, bm.link);
    assert_eq!(updated.user_id, bm.user_id);

    let fetched = t.db.bookmarks.get_by_id(bm.id).await.unwrap().unwrap();
    assert_eq!(fetched.categories, vec!["Travel"]);

    let missing = t
        .db
        .bookmarks
        .update(999_999, UpdateBookmarkRequest::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_delete_cascades_links() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let food = t.create_category("Food").await;
    let bm = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Doomed", vec![food.id]))
        .await
        .unwrap();

    t.db.bookmarks.delete(bm.id).await.unwrap();
    assert!(t.db.bookmarks.get_by_id(bm.id).await.unwrap().is_none());

    let (links,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM bookmark_category WHERE bookmark_id = $1")
            .bind(bm.id)
            .fetch_one(t.db.pool())
            .await
            .unwrap();
    assert_eq!(links, 0);

    // Deleting again is not an error.
    t.db.bookmarks.delete(bm.id).await.unwrap();

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_search_is_case_insensitive_substring() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    for title in ["Delicious Recipes", "World Travel Guide", "Latest Tech Trends"] {
        t.db.bookmarks
            .create(new_bookmark(user.id, title, vec![]))
            .await
            .unwrap();
    }

    let hits = t
        .db
        .bookmarks
        .search(BookmarkFilter::new().title("REC"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bookmark.title, "Delicious Recipes");

    let all = t
        .db
        .bookmarks
        .search(BookmarkFilter::new().title(""))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let none = t
        .db
        .bookmarks
        .search(BookmarkFilter::new().title("%"))
        .await
        .unwrap();
    assert!(none.is_empty());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_search_combines_criteria_and_scopes_owner() {
    let t = TestDatabase::new().await;
    let alice = t.create_user("alice@example.com").await;
    let bob = t.create_user("bob@example.com").await;
    t.db.bookmarks
        .create(new_bookmark(alice.id, "Alice Blog", vec![]))
        .await
        .unwrap();
    t.db.bookmarks
        .create(new_bookmark(bob.id, "Bob Blog", vec![]))
        .await
        .unwrap();

    let hits = t
        .db
        .bookmarks
        .search(BookmarkFilter::new().link("blog").user_id(bob.id))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bookmark.user_id, bob.id);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_list_by_owner_and_category_keeps_all_names() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let other = t.create_user("other@example.com").await;
    let food = t.create_category("Food").await;
    let life = t.create_category("Lifestyle").await;
    let travel = t.create_category("Travel").await;

    t.db.bookmarks
        .create(new_bookmark(user.id, "Recipes", vec![food.id, life.id]))
        .await
        .unwrap();
    t.db.bookmarks
        .create(new_bookmark(user.id, "Trips", vec![travel.id]))
        .await
        .unwrap();
    t.db.bookmarks
        .create(new_bookmark(other.id, "Other Food", vec![food.id]))
        .await
        .unwrap();

    let hits = t
        .db
        .bookmarks
        .list_by_owner_and_category(user.id, "Food")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bookmark.title, "Recipes");
    assert_eq!(hits[0].categories, vec!["Food", "Lifestyle"]);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_listing_is_newest_first_and_title_lookup_is_scoped() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    let other = t.create_user("other@example.com").await;
    let first = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "First", vec![]))
        .await
        .unwrap();
    let second = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Second", vec![]))
        .await
        .unwrap();

    let mine = t.db.bookmarks.list_by_owner(user.id).await.unwrap();
    let ids: Vec<i32> = mine.iter().map(|b| b.bookmark.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert!(t
        .db
        .bookmarks
        .get_by_title_and_owner("First", user.id)
        .await
        .unwrap()
        .is_some());
    assert!(t
        .db
        .bookmarks
        .get_by_title_and_owner("First", other.id)
        .await
        .unwrap()
        .is_none());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_title_is_unique_violation() {
    let t = TestDatabase::new().await;
    let user = t.create_user("owner@example.com").await;
    t.db.bookmarks
        .create(new_bookmark(user.id, "Taken", vec![]))
        .await
        .unwrap();

    let err = t
        .db
        .bookmarks
        .create(new_bookmark(user.id, "Taken", vec![]))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    t.cleanup().await;
}
