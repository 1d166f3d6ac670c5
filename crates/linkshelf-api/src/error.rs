//! HTTP error mapping.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use linkshelf_crypto::CryptoError;

static DEVELOPMENT_MODE: AtomicBool = AtomicBool::new(false);

/// Include internal error detail in 500 bodies (`APP_ENV=development`).
pub fn set_development_mode(enabled: bool) {
    DEVELOPMENT_MODE.store(enabled, Ordering::Relaxed);
}

fn development_mode() -> bool {
    DEVELOPMENT_MODE.load(Ordering::Relaxed)
}

#[derive(Debug)]
pub enum ApiError {
    /// Storage or other unexpected failure. Logged in full, shown generically.
    Internal(linkshelf_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<linkshelf_core::Error> for ApiError {
    fn from(err: linkshelf_core::Error) -> Self {
        use linkshelf_core::Error;

        if err.is_unique_violation() {
            let msg = match &err {
                Error::Database(sqlx::Error::Database(db_err)) => match db_err.constraint() {
                    Some(c) if c.contains("email") => {
                        "User already exists with this email.".to_string()
                    }
                    Some(c) if c.contains("title") => {
                        "Bookmark with this Title already exists".to_string()
                    }
                    _ => "Resource already exists".to_string(),
                },
                _ => "Resource already exists".to_string(),
            };
            return ApiError::Conflict(msg);
        }
        if err.is_foreign_key_violation() {
            return ApiError::BadRequest("Referenced resource does not exist".to_string());
        }

        match err {
            Error::BookmarkNotFound(_) => ApiError::NotFound("Bookmark not found".to_string()),
            Error::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed with internal error");
                if development_mode() {
                    serde_json::json!({
                        "error": "Internal server error",
                        "detail": err.to_string(),
                    })
                } else {
                    serde_json::json!({ "error": "Internal server error" })
                }
            }
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => serde_json::json!({ "error": msg }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkshelf_core::Error;

    #[test]
    fn test_core_errors_map_to_statuses() {
        let cases = [
            (Error::BookmarkNotFound(1), StatusCode::NOT_FOUND),
            (Error::UserNotFound(1), StatusCode::NOT_FOUND),
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_not_found_body_names_the_resource() {
        match ApiError::from(Error::BookmarkNotFound(3)) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Bookmark not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_crypto_error_is_internal() {
        let err = ApiError::from(CryptoError::EmptySecret);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
