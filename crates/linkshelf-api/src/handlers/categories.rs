//! Category handlers.

use axum::{extract::State, Json};

use linkshelf_core::{Category, CategoryRepository};

use crate::{ApiError, AppState};

/// All categories ordered by name.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.db.categories.list().await?))
}
