//! Bulk tag edit: apply per-species count deltas to many records at once.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aviary_core::validation::parse_tag_pairs;
use aviary_core::AppError;
use aviary_index::{BulkEditOp, EditItemResult};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Wire encoding of the operation: 0 decrements, 1 increments.
const OP_DECREMENT: i64 = 0;
const OP_INCREMENT: i64 = 1;

/// Bulk edit payload. `urls` may mix canonical and thumbnail URLs; `tags`
/// are `"species, count"` pairs with strictly positive counts.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TagEditRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    pub operation: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagEditResponse {
    pub message: String,
    /// Per-identifier outcome; members succeed and fail independently.
    pub results: Vec<EditItemResult>,
}

#[utoipa::path(
    post,
    path = "/api/v0/media/tags",
    tag = "media",
    request_body = TagEditRequest,
    responses(
        (status = 200, description = "Bulk edit completed (see per-id results)", body = TagEditResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn bulk_tag_edit(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<TagEditRequest>,
) -> Result<Json<TagEditResponse>, HttpAppError> {
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
    let op = match body.operation {
        Some(OP_INCREMENT) => BulkEditOp::Increment,
        Some(OP_DECREMENT) => BulkEditOp::Decrement,
        _ => {
            return Err(HttpAppError::from(AppError::InvalidInput(
                "operation must be 0 (decrement) or 1 (increment)".to_string(),
            )))
        }
    };
    if body.tags.is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "tags is required and must not be empty".to_string(),
        )));
    }
    let deltas = parse_tag_pairs(&body.tags).map_err(HttpAppError::from)?;

    let results = state
        .maintainer
        .bulk_tag_edit(&body.urls, op, &deltas)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(TagEditResponse {
        message: "Tags updated".to_string(),
        results,
    }))
}
