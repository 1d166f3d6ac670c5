//! # linkshelf-crypto
//!
//! Credential primitives for linkshelf.
//!
//! - **Password hashing**: Argon2id with a random per-password salt, stored
//!   as PHC strings ([`Argon2Hasher`]).
//! - **Bearer tokens**: HS256-signed JWTs carrying the user id and role
//!   ([`TokenSigner`], [`AuthClaims`]).
//!
//! ## Example
//!
//! ```rust
//! use chrono::Duration;
//! use linkshelf_core::Role;
//! use linkshelf_crypto::{Argon2Hasher, HashParams, TokenSigner};
//!
//! let hasher = Argon2Hasher::with_params(HashParams::fast_insecure()).unwrap();
//! let hash = hasher.hash("password").unwrap();
//! assert!(hasher.verify("password", &hash).unwrap());
//!
//! let signer = TokenSigner::new("secret", Duration::days(30)).unwrap();
//! let token = signer.issue(1, Role::User).unwrap();
//! assert_eq!(signer.verify(&token).unwrap().id, 1);
//! ```

pub mod error;
pub mod password;
pub mod token;

pub use error::{CryptoError, CryptoResult};
pub use password::{Argon2Hasher, HashParams};
pub use token::{AuthClaims, TokenSigner, DEFAULT_TOKEN_TTL_DAYS};
