//! Core traits for linkshelf abstractions.
//!
//! These traits define the interfaces that concrete storage backends
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// BOOKMARK REPOSITORY TRAITS
// =============================================================================

/// Repository for bookmarks, their categories, and the links between them.
///
/// Every read that returns [`BookmarkWithCategories`] aggregates category
/// names with outer-join semantics: bookmarks without categories are still
/// returned, with an empty list.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// All bookmarks, newest first.
    async fn list_all(&self) -> Result<Vec<BookmarkWithCategories>>;

    /// Get a bookmark by ID.
    async fn get_by_id(&self, id: i32) -> Result<Option<BookmarkWithCategories>>;

    /// Exact title lookup across all owners.
    async fn get_by_title(&self, title: &str) -> Result<Option<BookmarkWithCategories>>;

    /// Exact title lookup scoped to one owner.
    async fn get_by_title_and_owner(
        &self,
        title: &str,
        user_id: i32,
    ) -> Result<Option<BookmarkWithCategories>>;

    /// Bookmarks owned by a user, newest first.
    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<BookmarkWithCategories>>;

    /// Bookmarks owned by a user that are linked to the named category.
    ///
    /// Bookmarks without a link to that category are excluded.
    async fn list_by_owner_and_category(
        &self,
        user_id: i32,
        category: &str,
    ) -> Result<Vec<BookmarkWithCategories>>;

    /// Insert a bookmark, then link each category id.
    ///
    /// Not atomic: each insert commits on its own. The first failing link
    /// is returned as the error, leaving the bookmark row and any links
    /// inserted before it in place.
    async fn create(&self, req: CreateBookmarkRequest) -> Result<Bookmark>;

    /// Like [`create`](Self::create) but all inserts share one transaction.
    async fn create_atomic(&self, req: CreateBookmarkRequest) -> Result<Bookmark>;

    /// Partial update; categories are untouched. `None` if no row matched.
    async fn update(&self, id: i32, req: UpdateBookmarkRequest) -> Result<Option<Bookmark>>;

    /// Delete a bookmark and, by cascade, its category links.
    ///
    /// Deleting a missing id is not an error.
    async fn delete(&self, id: i32) -> Result<()>;

    /// Link a category. Linking an already-linked pair is a no-op.
    async fn link_category(&self, bookmark_id: i32, category_id: i32) -> Result<()>;

    /// Unlink a category. Unlinking a pair that is not linked is a no-op.
    async fn unlink_category(&self, bookmark_id: i32, category_id: i32) -> Result<()>;

    /// Bookmarks matching every provided criterion, newest first.
    async fn search(&self, filter: BookmarkFilter) -> Result<Vec<BookmarkWithCategories>>;
}

// =============================================================================
// CATEGORY REPOSITORY TRAITS
// =============================================================================

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories ordered by name.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Get a category by exact name.
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Create a category if it doesn't exist and return it.
    async fn create(&self, name: &str) -> Result<Category>;
}

// =============================================================================
// USER REPOSITORY TRAITS
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up credentials by email. Includes the password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// Get a user by ID (public fields only).
    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;

    /// Hash the password and insert the user.
    ///
    /// A duplicate email surfaces as a database unique violation; callers
    /// should check [`find_by_email`](Self::find_by_email) first.
    async fn create(&self, name: &str, email: &str, password: &str) -> Result<User>;

    /// All users ordered by name.
    async fn list_all(&self) -> Result<Vec<User>>;

    /// Set a user's role. Values outside [`Role::ALL`] are rejected before
    /// any storage access. `None` if no row matched.
    async fn update_role(&self, id: i32, role: &str) -> Result<Option<User>>;
}
