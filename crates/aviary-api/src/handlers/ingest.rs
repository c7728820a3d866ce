//! Media ingest: upsert a record from the tagging pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aviary_core::models::MediaKind;
use aviary_core::AppError;
use aviary_index::UpsertRequest;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Payload from the tagging pipeline. `tags` is always a complete
/// replacement map, never a delta.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    pub s3_url: String,
    #[serde(default)]
    pub thumbnail_s3_url: Option<String>,
    pub file_type: MediaKind,
    #[serde(default)]
    pub tags: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub message: String,
    pub s3_url: String,
    /// Species whose index entries were (re)written.
    pub species_updated: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v0/media",
    tag = "media",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Media record upserted", body = IngestResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn ingest_media(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<IngestRequest>,
) -> Result<Json<IngestResponse>, HttpAppError> {
    if body.s3_url.trim().is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "s3_url is required".to_string(),
        )));
    }

    let outcome = state
        .maintainer
        .upsert(UpsertRequest {
            url: body.s3_url,
            kind: body.file_type,
            tags: body.tags,
            thumbnail_url: body.thumbnail_s3_url,
        })
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(IngestResponse {
        message: "Media file inserted/updated successfully".to_string(),
        s3_url: outcome.url,
        species_updated: outcome.species_updated,
    }))
}
