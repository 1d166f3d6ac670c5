//! Error types for linkshelf.

use thiserror::Error;

/// Result type alias using linkshelf's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for linkshelf operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Bookmark not found
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(i32),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(i32),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing or token signing failed
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the wrapped database error is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
        )
    }

    /// True when the wrapped database error is a foreign-key violation.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation()
        )
    }
}
