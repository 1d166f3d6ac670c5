//! Registration, login, and current-user handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use linkshelf_core::{Error, User, UserRepository};

use crate::auth::RequireAuth;
use crate::{ApiError, AppState, JsonBody};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Column widths of `users.name` and `users.email`.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate a registration body, returning (name, email, password).
pub fn validate_registration(
    req: RegisterRequest,
) -> Result<(String, String, String), ApiError> {
    let (Some(name), Some(email), Some(password)) = (
        required(req.name),
        required(req.email),
        required(req.password),
    ) else {
        return Err(ApiError::BadRequest(
            "Name, email, and password are required".to_string(),
        ));
    };
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let (name, email) = (name.trim().to_string(), email.trim().to_string());
    if name.chars().count() > MAX_NAME_LEN || email.chars().count() > MAX_EMAIL_LEN {
        return Err(ApiError::BadRequest(format!(
            "Name must be at most {} and email at most {} characters",
            MAX_NAME_LEN, MAX_EMAIL_LEN
        )));
    }
    Ok((name, email, password))
}

/// Register a new account.
///
/// # Returns
/// - 201 Created with `{message, user}`
/// - 400 Bad Request if a field is missing or the email is taken
/// - 409 Conflict if the email was taken concurrently
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (name, email, password) = validate_registration(body)?;

    if state.db.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest(
            "User already exists with this email.".to_string(),
        ));
    }

    let user = state.db.users.create(&name, &email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

/// Exchange email and password for a bearer token.
///
/// # Returns
/// - 200 OK with `{message, token, user}`
/// - 400 Bad Request on missing fields or wrong credentials
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(email), Some(password)) = (required(body.email), required(body.password)) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };
    let invalid = || ApiError::BadRequest("Invalid email or password.".to_string());

    let creds = state
        .db
        .users
        .find_by_email(email.trim())
        .await?
        .ok_or_else(invalid)?;

    let hasher = state.db.users.hasher().clone();
    let stored_hash = creds.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
        .await
        .map_err(|e| {
            ApiError::Internal(linkshelf_core::Error::Internal(format!(
                "Password verification task failed: {}",
                e
            )))
        })??;
    if !valid {
        return Err(invalid());
    }

    let token = state.signer.issue(creds.user.id, creds.user.role)?;
    info!(subsystem = "api", component = "auth", user_id = creds.user.id, "User logged in");

    Ok(Json(serde_json::json!({
        "message": "Logged in successfully",
        "token": token,
        "user": creds.user,
    })))
}

/// The authenticated caller's profile.
///
/// # Returns
/// - 200 OK with the user
/// - 404 Not Found if the account no longer exists
pub async fn me(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<User>, ApiError> {
    let user = state
        .db
        .users
        .find_by_id(auth.user_id())
        .await?
        .ok_or(Error::UserNotFound(auth.user_id()))?;
    Ok(Json(user))
}
