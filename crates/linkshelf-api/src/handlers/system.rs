//! Root and health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::warn;

use linkshelf_db::log_pool_metrics;

use crate::auth::OptionalAuth;
use crate::AppState;

/// Welcome message. Names the caller's id when a valid token is sent.
pub async fn root(OptionalAuth(claims): OptionalAuth) -> Json<serde_json::Value> {
    match claims {
        Some(claims) => Json(serde_json::json!({
            "message": "Welcome to the linkshelf API",
            "user_id": claims.id,
            "role": claims.role,
        })),
        None => Json(serde_json::json!({ "message": "Welcome to the linkshelf API" })),
    }
}

/// Liveness plus a database round trip.
///
/// # Returns
/// - 200 OK with `{status: "ok", database: "ok"}`
/// - 503 Service Unavailable if the database ping fails
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    log_pool_metrics(state.db.pool());
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "ok",
            })),
        ),
        Err(e) => {
            warn!(subsystem = "api", component = "health", error = %e, "Database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "database": "unreachable",
                })),
            )
        }
    }
}
