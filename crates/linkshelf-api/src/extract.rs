//! Request body extraction.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError::BadRequest`], so a
/// malformed body gets the same `{"error": ...}` shape as every other 400.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!(subsystem = "api", error = %rejection, "Rejected request body");
                Err(ApiError::BadRequest(rejection.body_text()))
            }
        }
    }
}
