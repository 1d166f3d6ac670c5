//! End-to-end bookmark flow against a real database.
//!
//! Requires PostgreSQL (see `linkshelf_db::test_fixtures`); run with
//! `cargo test -- --ignored`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use tower::ServiceExt;

use linkshelf_api::{build_app, services::import_batch, services::BatchEntry, AppState};
use linkshelf_core::{BookmarkRepository, Role};
use linkshelf_crypto::TokenSigner;
use linkshelf_db::test_fixtures::TestDatabase;

fn app_for(test_db: &TestDatabase) -> Router {
    let signer = TokenSigner::new("flow-test-secret", Duration::days(1)).unwrap();
    build_app(
        AppState::new(test_db.db.clone(), signer),
        vec!["http://localhost:3000".parse().unwrap()],
    )
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn entry(title: &str, link: &str) -> BatchEntry {
    BatchEntry {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        category_ids: vec![],
    }
}

#[tokio::test]
#[ignore]
async fn test_batch_import_skips_blank_and_repeated_titles() {
    let t = TestDatabase::new().await;
    let user = t.create_user("batch@example.com").await;

    let created = import_batch(
        &t.db.bookmarks,
        user.id,
        vec![entry("A", "x"), entry("", "y"), entry("A", "z")],
    )
    .await
    .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "A");
    assert_eq!(created[0].link, "x");

    // A second import of the same title is skipped as already owned.
    let again = import_batch(&t.db.bookmarks, user.id, vec![entry("A", "w")])
        .await
        .unwrap();
    assert!(again.is_empty());
    assert_eq!(t.db.bookmarks.list_by_owner(user.id).await.unwrap().len(), 1);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_batch_import_skips_overlong_title() {
    let t = TestDatabase::new().await;
    let app = app_for(&t);
    let user = t.create_user("long@example.com").await;
    let token = TokenSigner::new("flow-test-secret", Duration::days(1))
        .unwrap()
        .issue(user.id, Role::User)
        .unwrap();

    let (status, body) = call(
        &app,
        "POST",
        "/api/bookmarks/batch",
        Some(&token),
        Some(serde_json::json!({"bookmarks": [
            {"title": "A", "link": "https://example.com/a"},
            {"title": "x".repeat(300), "link": "https://example.com/x"},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bookmarks"].as_array().unwrap().len(), 1);
    assert_eq!(t.db.bookmarks.list_by_owner(user.id).await.unwrap().len(), 1);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_create_with_unknown_category_is_reported() {
    let t = TestDatabase::new().await;
    let app = app_for(&t);
    let user = t.create_user("unknown-cat@example.com").await;
    let token = TokenSigner::new("flow-test-secret", Duration::days(1))
        .unwrap()
        .issue(user.id, Role::User)
        .unwrap();

    let (status, body) = call(
        &app,
        "POST",
        "/bookmarks",
        Some(&token),
        Some(serde_json::json!({
            "user_id": user.id,
            "title": "Dangling",
            "link": "https://example.com/dangling",
            "category_ids": [9999],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_register_login_and_manage_bookmarks() {
    let t = TestDatabase::new().await;
    let app = app_for(&t);

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password").is_none());
    let user_id = body["user"]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"email": "ada@example.com", "password": "wrong!"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let food = t.create_category("Food").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/bookmarks",
        Some(&token),
        Some(serde_json::json!({
            "user_id": user_id,
            "title": "Delicious Recipes",
            "link": "https://example.com/food-blog",
            "category_ids": [food.id, food.id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bookmark_id = body["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        "POST",
        "/api/bookmarks",
        Some(&token),
        Some(serde_json::json!({
            "user_id": user_id,
            "title": "Delicious Recipes",
            "link": "https://example.com/other",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, "GET", "/api/bookmarks/category/Food", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["categories"], serde_json::json!(["Food"]));

    let (status, body) = call(&app, "GET", "/bookmarks/search?title=REC", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/bookmarks/{}", bookmark_id),
        Some(&token),
        Some(serde_json::json!({"title": "Recipes"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["link"], "https://example.com/food-blog");

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/bookmarks/{}", bookmark_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/bookmarks/{}", bookmark_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    t.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_admin_changes_role() {
    let t = TestDatabase::new().await;
    let app = app_for(&t);
    let target = t.create_user("target@example.com").await;
    let signer = TokenSigner::new("flow-test-secret", Duration::days(1)).unwrap();
    let admin_token = signer.issue(target.id + 1000, Role::Admin).unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/users/{}/role", target.id),
        Some(&admin_token),
        Some(serde_json::json!({"role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");

    let (status, _) = call(
        &app,
        "PUT",
        "/users/999999/role",
        Some(&admin_token),
        Some(serde_json::json!({"role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    t.cleanup().await;
}
