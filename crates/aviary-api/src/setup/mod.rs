//! Application setup and initialization
//!
//! This module contains the initialization logic extracted from main.rs:
//! store wiring, state construction, and route setup.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};

use aviary_core::{Config, ObjectStorageBackend};
use aviary_index::IndexMaintainer;
use aviary_store::{
    MemoryAliasMap, MemoryObjectStorage, MemoryRecordStore, MemorySpeciesIndex, ObjectStorage,
    S3ObjectStorage,
};

use crate::state::AppState;

/// Initialize the entire application: stores, maintainer, state, routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let objects: Arc<dyn ObjectStorage> = match config.storage_backend {
        ObjectStorageBackend::S3 => {
            let region = config
                .s3_region
                .clone()
                .context("S3_REGION is required for the s3 backend")?;
            Arc::new(S3ObjectStorage::new(region, config.s3_endpoint.clone()))
        }
        ObjectStorageBackend::Memory => {
            tracing::warn!(
                "Using in-memory object storage; external deletes are recorded, not performed"
            );
            Arc::new(MemoryObjectStorage::new())
        }
    };

    let maintainer = Arc::new(IndexMaintainer::new(
        Arc::new(MemoryRecordStore::new()),
        Arc::new(MemorySpeciesIndex::new()),
        Arc::new(MemoryAliasMap::new()),
        objects,
    ));

    let state = Arc::new(AppState::new(maintainer, config.clone()));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
