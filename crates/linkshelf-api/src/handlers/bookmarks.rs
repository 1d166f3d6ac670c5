//! Bookmark HTTP handlers.
//!
//! Creation and listing scoped to the caller require a token. Lookup and
//! search accept anonymous callers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use linkshelf_core::{
    title_fits, Bookmark, BookmarkFilter, BookmarkRepository, BookmarkWithCategories,
    CreateBookmarkRequest, Error, UpdateBookmarkRequest, MAX_TITLE_LEN,
};

use crate::auth::{OptionalAuth, RequireAuth};
use crate::services::{import_batch, BatchEntry};
use crate::{ApiError, AppState, JsonBody};

/// Body of `POST /bookmarks`. Fields are optional on the wire so a missing
/// one is reported as a 400, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateBookmarkBody {
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

impl CreateBookmarkBody {
    pub fn into_request(self) -> Result<CreateBookmarkRequest, ApiError> {
        match (self.user_id, self.title, self.link) {
            (Some(user_id), Some(title), Some(link)) if !title.is_empty() && !link.is_empty() => {
                if !title_fits(&title) {
                    return Err(title_too_long());
                }
                Ok(CreateBookmarkRequest {
                    user_id,
                    title,
                    link,
                    category_ids: self.category_ids,
                })
            }
            _ => Err(ApiError::BadRequest("All fields are required".to_string())),
        }
    }
}

/// Body of `POST /bookmarks/batch`. `bookmarks` stays untyped until it is
/// known to be a non-empty array, so a wrong shape gets the batch message.
#[derive(Debug, Deserialize)]
pub struct BatchBody {
    pub bookmarks: Option<serde_json::Value>,
}

impl BatchBody {
    pub fn into_entries(self) -> Result<Vec<BatchEntry>, ApiError> {
        match self.bookmarks {
            Some(serde_json::Value::Array(items)) if !items.is_empty() => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<BatchEntry>, _>>()
                .map_err(|e| ApiError::BadRequest(format!("Invalid bookmark entry: {}", e))),
            _ => Err(ApiError::BadRequest(
                "A non-empty bookmarks array is required".to_string(),
            )),
        }
    }
}

/// Reject updates that would store a row creation refuses.
pub fn validate_update(req: &UpdateBookmarkRequest) -> Result<(), ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one of user_id, title, or link is required".to_string(),
        ));
    }
    if req.title.as_deref() == Some("") || req.link.as_deref() == Some("") {
        return Err(ApiError::BadRequest(
            "Title and link cannot be empty".to_string(),
        ));
    }
    if req.title.as_deref().is_some_and(|t| !title_fits(t)) {
        return Err(title_too_long());
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CategoryLinkBody {
    pub bookmark_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl CategoryLinkBody {
    fn ids(&self) -> Result<(i32, i32), ApiError> {
        match (self.bookmark_id, self.category_id) {
            (Some(b), Some(c)) => Ok((b, c)),
            _ => Err(ApiError::BadRequest(
                "bookmark_id and category_id are required".to_string(),
            )),
        }
    }
}

/// Query parameters for bookmark search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub link: Option<String>,
    pub user_id: Option<i32>,
    /// Restrict to the authenticated caller's bookmarks.
    #[serde(default)]
    pub mine: bool,
}

fn not_found(id: i32) -> ApiError {
    Error::BookmarkNotFound(id).into()
}

fn title_too_long() -> ApiError {
    ApiError::BadRequest(format!(
        "Title must be at most {} characters",
        MAX_TITLE_LEN
    ))
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": text }))
}

/// Create a bookmark and link its categories.
///
/// # Returns
/// - 201 Created with the bookmark (without categories)
/// - 400 Bad Request if a field is missing, the title is too long or taken,
///   or a category id does not exist
pub async fn create_bookmark(
    State(state): State<AppState>,
    _auth: RequireAuth,
    JsonBody(body): JsonBody<CreateBookmarkBody>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let req = body.into_request()?;

    if state.db.bookmarks.get_by_title(&req.title).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Bookmark with this Title already exists".to_string(),
        ));
    }

    let bookmark = state.db.bookmarks.create(req).await?;
    info!(
        subsystem = "api",
        component = "bookmarks",
        op = "create",
        bookmark_id = bookmark.id,
        "Bookmark created"
    );
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Every bookmark of every user, newest first.
pub async fn list_bookmarks(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<Json<Vec<BookmarkWithCategories>>, ApiError> {
    Ok(Json(state.db.bookmarks.list_all().await?))
}

/// The caller's bookmarks, newest first.
pub async fn list_my_bookmarks(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<BookmarkWithCategories>>, ApiError> {
    Ok(Json(state.db.bookmarks.list_by_owner(auth.user_id()).await?))
}

/// The caller's bookmarks linked to the named category.
pub async fn list_my_bookmarks_in_category(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(category): Path<String>,
) -> Result<Json<Vec<BookmarkWithCategories>>, ApiError> {
    let bookmarks = state
        .db
        .bookmarks
        .list_by_owner_and_category(auth.user_id(), &category)
        .await?;
    Ok(Json(bookmarks))
}

/// Import several bookmarks for the caller.
///
/// # Returns
/// - 201 Created with `{message, bookmarks}` (only the ones actually created)
/// - 400 Bad Request if the array is missing, empty, or not an array
pub async fn create_bookmarks_batch(
    State(state): State<AppState>,
    auth: RequireAuth,
    JsonBody(body): JsonBody<BatchBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let entries = body.into_entries()?;

    let created = import_batch(&state.db.bookmarks, auth.user_id(), entries).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Bookmarks created",
            "bookmarks": created,
        })),
    ))
}

/// Search by title/link substring and owner.
///
/// # Query Parameters
/// - `title`, `link`: case-insensitive substring (optional)
/// - `user_id`: exact owner id (optional)
/// - `mine`: `true` to search only the caller's bookmarks (requires a token)
///
/// # Returns
/// - 200 OK with matching bookmarks
/// - 401 Unauthorized if `mine=true` without a valid token
pub async fn search_bookmarks(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<BookmarkWithCategories>>, ApiError> {
    let mut filter = BookmarkFilter {
        title: query.title,
        link: query.link,
        user_id: query.user_id,
    };
    if query.mine {
        let claims = claims.ok_or_else(|| {
            ApiError::Unauthorized("Sign in to search your own bookmarks.".to_string())
        })?;
        filter.user_id = Some(claims.id);
    }

    Ok(Json(state.db.bookmarks.search(filter).await?))
}

/// A single bookmark with its categories.
pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BookmarkWithCategories>, ApiError> {
    let bookmark = state
        .db
        .bookmarks
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(bookmark))
}

/// Partially update a bookmark's owner, title, or link.
///
/// # Returns
/// - 200 OK with the updated bookmark
/// - 400 Bad Request if no field is given, a given title or link is blank,
///   the title is too long, or it belongs to another bookmark
/// - 404 Not Found if the bookmark doesn't exist
pub async fn update_bookmark(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i32>,
    JsonBody(body): JsonBody<UpdateBookmarkRequest>,
) -> Result<Json<Bookmark>, ApiError> {
    validate_update(&body)?;
    if state.db.bookmarks.get_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }
    if let Some(title) = &body.title {
        if let Some(existing) = state.db.bookmarks.get_by_title(title).await? {
            if existing.bookmark.id != id {
                return Err(ApiError::BadRequest(
                    "Bookmark with this Title already exists".to_string(),
                ));
            }
        }
    }

    let bookmark = state
        .db
        .bookmarks
        .update(id, body)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(bookmark))
}

/// Delete a bookmark and its category links.
pub async fn delete_bookmark(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.db.bookmarks.get_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }
    state.db.bookmarks.delete(id).await?;
    Ok(message("Bookmark deleted successfully"))
}

/// Link a category to a bookmark. Re-linking is a no-op.
pub async fn add_category(
    State(state): State<AppState>,
    _auth: RequireAuth,
    JsonBody(body): JsonBody<CategoryLinkBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (bookmark_id, category_id) = body.ids()?;
    state
        .db
        .bookmarks
        .link_category(bookmark_id, category_id)
        .await?;
    Ok(message("Category added to bookmark successfully"))
}

/// Unlink a category from a bookmark. Unlinking a missing pair is a no-op.
pub async fn remove_category(
    State(state): State<AppState>,
    _auth: RequireAuth,
    JsonBody(body): JsonBody<CategoryLinkBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (bookmark_id, category_id) = body.ids()?;
    state
        .db
        .bookmarks
        .unlink_category(bookmark_id, category_id)
        .await?;
    Ok(message("Category removed from bookmark successfully"))
}
