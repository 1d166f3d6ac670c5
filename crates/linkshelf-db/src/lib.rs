//! # linkshelf-db
//!
//! PostgreSQL database layer for linkshelf.
//!
//! This crate provides:
//! - Connection pool management
//! - Idempotent schema provisioning and default data seeding
//! - Repository implementations for bookmarks, categories, and users
//! - Parameterized bookmark search
//!
//! ## Example
//!
//! ```rust,ignore
//! use linkshelf_db::{BookmarkRepository, CreateBookmarkRequest, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/linkshelf").await?;
//!     db.ensure_schema().await?;
//!
//!     let bookmark = db.bookmarks.create(CreateBookmarkRequest {
//!         user_id: 1,
//!         title: "Rust Book".to_string(),
//!         link: "https://doc.rust-lang.org/book/".to_string(),
//!         category_ids: vec![3],
//!     }).await?;
//!
//!     println!("Created bookmark: {}", bookmark.id);
//!     Ok(())
//! }
//! ```
pub mod bookmark_filter;
pub mod bookmarks;
pub mod categories;
pub mod pool;
pub mod schema;
pub mod users;

// Always compiled so integration tests (in tests/) can use it.
pub mod test_fixtures;

// Re-export core types
pub use linkshelf_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use bookmark_filter::{BookmarkFilterQueryBuilder, QueryParam};
pub use bookmarks::PgBookmarkRepository;
pub use categories::PgCategoryRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use schema::SeedReport;
pub use users::PgUserRepository;

use linkshelf_crypto::Argon2Hasher;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub bookmarks: PgBookmarkRepository,
    pub categories: PgCategoryRepository,
    pub users: PgUserRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self::with_password_hasher(pool, Argon2Hasher::default())
    }

    /// Like [`new`](Self::new) with explicit password hashing parameters.
    pub fn with_password_hasher(pool: sqlx::Pool<sqlx::Postgres>, hasher: Argon2Hasher) -> Self {
        Self {
            bookmarks: PgBookmarkRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            users: PgUserRepository::with_hasher(pool.clone(), hasher),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Round-trip a trivial query to confirm the database is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    /// Create any missing tables. Safe to call on every start.
    pub async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    /// Seed default users, categories, and bookmarks into empty tables.
    pub async fn seed_defaults(&self) -> SeedReport {
        schema::seed_defaults(self).await
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::with_password_hasher(self.pool.clone(), self.users.hasher().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
    }
}
