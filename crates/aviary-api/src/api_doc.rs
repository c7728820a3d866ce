//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aviary API",
        version = "0.1.0",
        description = "Species-tag media catalog API (v0): ingest tagged media, bulk-edit tag counts, delete media with cascades, and search by species with minimum counts. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::ingest::ingest_media,
        handlers::tag_edit::bulk_tag_edit,
        handlers::media_delete::batch_delete_media,
        handlers::search::search_media,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::ingest::IngestRequest,
        handlers::ingest::IngestResponse,
        handlers::tag_edit::TagEditRequest,
        handlers::tag_edit::TagEditResponse,
        handlers::search::SearchRequest,
        handlers::search::SearchResponse,
        handlers::media_delete::DeleteRequest,
        handlers::media_delete::DeleteResponse,
        aviary_core::models::MediaKind,
        aviary_index::EditItemResult,
        aviary_index::DeleteItemResult,
    )),
    tags(
        (name = "media", description = "Catalog mutation endpoints"),
        (name = "search", description = "Species search endpoints")
    )
)]
struct ApiDoc;
