//! User administration handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use linkshelf_core::{Error, User, UserRepository};

use crate::auth::RequireAuth;
use crate::{ApiError, AppState, JsonBody};

#[derive(Debug, Deserialize)]
pub struct UpdateRoleBody {
    pub role: Option<String>,
}

/// All users, public fields only, ordered by name.
pub async fn list_users(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.db.users.list_all().await?))
}

/// Change a user's role. Admin only.
///
/// # Returns
/// - 200 OK with `{message, user}`
/// - 400 Bad Request if the role is not `admin` or `user`
/// - 403 Forbidden if the caller is not an admin
/// - 404 Not Found if the user doesn't exist
pub async fn update_user_role(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
    JsonBody(body): JsonBody<UpdateRoleBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    let role = body.role.unwrap_or_default();
    let user = state
        .db
        .users
        .update_role(id, &role)
        .await?
        .ok_or(Error::UserNotFound(id))?;

    info!(
        subsystem = "api",
        component = "users",
        op = "update_role",
        user_id = user.id,
        role = %user.role,
        changed_by = auth.user_id(),
        "User role updated"
    );
    Ok(Json(serde_json::json!({
        "message": "User role updated successfully",
        "user": user,
    })))
}
