//! Species search: intersection of per-species minimum-count criteria.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aviary_core::AppError;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Search criteria: species name to minimum observation count. Every
/// criterion must hold (AND semantics).
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub tags: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// Resolved links: thumbnail for images that have one, canonical URL otherwise.
    pub links: Vec<String>,
    pub count: usize,
}

#[utoipa::path(
    post,
    path = "/api/v0/search",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching media (possibly empty)", body = SearchResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn search_media(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<SearchRequest>,
) -> Result<Json<SearchResponse>, HttpAppError> {
    if body.tags.is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "tags is required and must not be empty".to_string(),
        )));
    }

    let links: Vec<String> = state
        .maintainer
        .search(&body.tags)
        .await
        .map_err(HttpAppError::from)?
        .into_iter()
        .collect();

    let count = links.len();
    Ok(Json(SearchResponse { links, count }))
}
