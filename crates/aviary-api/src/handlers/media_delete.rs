//! Batch media delete: remove objects, records, index entries, and aliases.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aviary_core::AppError;
use aviary_index::DeleteItemResult;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Identifiers to delete: canonical or thumbnail URLs.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    /// Identifiers whose deletion succeeded, in request order.
    pub deleted: Vec<String>,
    /// Per-identifier outcome; members succeed and fail independently.
    pub results: Vec<DeleteItemResult>,
}

#[utoipa::path(
    post,
    path = "/api/v0/media/batch/delete",
    tag = "media",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Batch delete completed (see per-id results)", body = DeleteResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn batch_delete_media(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<DeleteRequest>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    if body.urls.is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "urls is required and must not be empty".to_string(),
        )));
    }
    if body.urls.len() > state.config.max_batch_size {
        return Err(HttpAppError::from(AppError::InvalidInput(format!(
            "Batch size exceeds maximum of {}",
            state.config.max_batch_size
        ))));
    }

    let results = state
        .maintainer
        .delete(&body.urls)
        .await
        .map_err(HttpAppError::from)?;

    let deleted = results
        .iter()
        .filter(|r| r.succeeded())
        .map(|r| r.id.clone())
        .collect();

    Ok(Json(DeleteResponse { deleted, results }))
}
