//! Bearer token issuance and verification (HS256 JWT).

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use linkshelf_core::Role;

use crate::error::{CryptoError, CryptoResult};

/// Default token lifetime in days.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// Identity claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Authenticated user id.
    pub id: i32,
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl AuthClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

/// Signs and verifies bearer tokens with a shared secret.
///
/// Cheap to clone; the keys live behind an `Arc`.
#[derive(Clone)]
pub struct TokenSigner {
    keys: Arc<Keys>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.keys.ttl.num_seconds())
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> CryptoResult<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CryptoError::EmptySecret);
        }

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation: Validation::new(Algorithm::HS256),
                ttl,
            }),
        })
    }

    /// Token lifetime applied by [`issue`](Self::issue).
    pub fn ttl(&self) -> Duration {
        self.keys.ttl
    }

    /// Issue a token for a user, valid for the configured lifetime.
    pub fn issue(&self, user_id: i32, role: Role) -> CryptoResult<String> {
        let now = Utc::now();
        let claims = AuthClaims {
            id: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.keys.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims as-is.
    pub fn sign(&self, claims: &AuthClaims) -> CryptoResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding)
            .map_err(|e| CryptoError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> CryptoResult<AuthClaims> {
        decode::<AuthClaims>(token, &self.keys.decoding, &self.keys.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CryptoError::ExpiredToken,
                _ => CryptoError::InvalidToken(e.to_string()),
            })
    }
}
