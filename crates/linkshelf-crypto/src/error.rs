//! Error types for cryptographic operations.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Invalid Argon2 cost parameters.
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// Stored hash is not a valid PHC string.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    /// Signing secret is empty.
    #[error("Token signing secret must not be empty")]
    EmptySecret,

    /// Token could not be signed.
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Token signature, structure, or claims are invalid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token was valid once but its expiry has passed.
    #[error("Token expired")]
    ExpiredToken,
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

impl From<CryptoError> for linkshelf_core::Error {
    fn from(err: CryptoError) -> Self {
        linkshelf_core::Error::Crypto(err.to_string())
    }
}
