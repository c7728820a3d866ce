//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p aviary-api`. The whole stack runs
//! over the in-memory store backends; the handles kept on `TestApp` share
//! state with the server, so tests can seed and inspect the stores directly.

use std::sync::Arc;

use axum_test::TestServer;

use aviary_api::constants;
use aviary_api::setup::routes;
use aviary_api::state::AppState;
use aviary_core::Config;
use aviary_index::IndexMaintainer;
use aviary_store::{MemoryAliasMap, MemoryObjectStorage, MemoryRecordStore, MemorySpeciesIndex};

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles to the backing stores.
pub struct TestApp {
    pub server: TestServer,
    pub records: MemoryRecordStore,
    pub index: MemorySpeciesIndex,
    pub aliases: MemoryAliasMap,
    pub objects: MemoryObjectStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    let records = MemoryRecordStore::new();
    let index = MemorySpeciesIndex::new();
    let aliases = MemoryAliasMap::new();
    let objects = MemoryObjectStorage::new();

    let maintainer = Arc::new(IndexMaintainer::new(
        Arc::new(records.clone()),
        Arc::new(index.clone()),
        Arc::new(aliases.clone()),
        Arc::new(objects.clone()),
    ));

    let config = Config::default();
    let state = Arc::new(AppState::new(maintainer, config.clone()));
    let router = routes::setup_routes(&config, state).expect("router setup");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        records,
        index,
        aliases,
        objects,
    }
}

/// Canonical/thumbnail URL pair used across tests.
pub const MEDIA_URL: &str = "https://birds.s3.amazonaws.com/media/file123.jpg";
pub const THUMB_URL: &str = "https://birds.s3.amazonaws.com/media/thumbs/file123-thumb.jpg";

/// Seed one image record through the public ingest endpoint.
pub async fn ingest_media(app: &TestApp, url: &str, thumb: Option<&str>, tags: serde_json::Value) {
    let response = app
        .client()
        .post(&api_path("/media"))
        .json(&serde_json::json!({
            "s3_url": url,
            "thumbnail_s3_url": thumb,
            "file_type": "image",
            "tags": tags,
        }))
        .await;
    assert_eq!(response.status_code(), 200, "seed ingest failed");
}
