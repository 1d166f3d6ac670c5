//! Access control gate.
//!
//! Two extractors share one verification step:
//!
//! | credential            | [`RequireAuth`] | [`OptionalAuth`] |
//! |-----------------------|-----------------|------------------|
//! | absent                | 401             | proceeds, `None` |
//! | present, fails verify | 403             | proceeds, `None` |
//! | valid                 | claims          | `Some(claims)`   |
//!
//! On success the claims are also stored in the request extensions.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use linkshelf_crypto::{AuthClaims, TokenSigner};

use crate::error::ApiError;

/// Outcome of inspecting a request's bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Absent,
    Invalid,
    Valid(AuthClaims),
}

/// The token part of an `Authorization: <scheme> <token>` header.
///
/// Like the header split the web clients rely on, the second space-separated
/// segment is taken as the token. A missing or empty segment counts as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').nth(1))
        .filter(|t| !t.is_empty())
}

/// Classify the request's credential. No I/O beyond signature verification.
pub fn inspect_credential(headers: &HeaderMap, signer: &TokenSigner) -> Credential {
    let Some(token) = bearer_token(headers) else {
        return Credential::Absent;
    };
    match signer.verify(token) {
        Ok(claims) => Credential::Valid(claims),
        Err(e) => {
            debug!(subsystem = "api", component = "auth", error = %e, "Bearer token rejected");
            Credential::Invalid
        }
    }
}

/// Extractor for routes that require a valid token.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthClaims);

impl RequireAuth {
    pub fn claims(&self) -> &AuthClaims {
        &self.0
    }

    pub fn user_id(&self) -> i32 {
        self.0.id
    }

    /// Reject callers whose token does not carry the admin role.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if !self.0.is_admin() {
            return Err(ApiError::Forbidden("Admin access required.".to_string()));
        }
        Ok(())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    TokenSigner: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let signer = TokenSigner::from_ref(state);
        match inspect_credential(&parts.headers, &signer) {
            Credential::Absent => Err(ApiError::Unauthorized(
                "Access denied. No token provided.".to_string(),
            )),
            Credential::Invalid => Err(ApiError::Forbidden("Invalid token.".to_string())),
            Credential::Valid(claims) => {
                parts.extensions.insert(claims.clone());
                Ok(RequireAuth(claims))
            }
        }
    }
}

/// Extractor that never rejects; carries claims only for a valid token.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthClaims>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    TokenSigner: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let signer = TokenSigner::from_ref(state);
        match inspect_credential(&parts.headers, &signer) {
            Credential::Valid(claims) => {
                parts.extensions.insert(claims.clone());
                Ok(OptionalAuth(Some(claims)))
            }
            Credential::Absent | Credential::Invalid => Ok(OptionalAuth(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;
    use linkshelf_core::Role;

    fn signer() -> TokenSigner {
        TokenSigner::new("gate-secret", Duration::days(1)).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_takes_second_segment() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_inspect_credential_states() {
        let signer = signer();
        assert_eq!(
            inspect_credential(&HeaderMap::new(), &signer),
            Credential::Absent
        );
        assert_eq!(
            inspect_credential(&headers_with("Bearer not.a.token"), &signer),
            Credential::Invalid
        );

        let token = signer.issue(5, Role::User).unwrap();
        match inspect_credential(&headers_with(&format!("Bearer {}", token)), &signer) {
            Credential::Valid(claims) => assert_eq!(claims.id, 5),
            other => panic!("expected valid credential, got {:?}", other),
        }
    }

    #[test]
    fn test_require_admin() {
        let claims = AuthClaims {
            id: 1,
            role: Role::User,
            iat: 0,
            exp: i64::MAX,
        };
        assert!(RequireAuth(claims.clone()).require_admin().is_err());
        let admin = AuthClaims {
            role: Role::Admin,
            ..claims
        };
        assert!(RequireAuth(admin).require_admin().is_ok());
    }
}
