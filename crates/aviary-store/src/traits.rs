//! Store abstraction traits
//!
//! The index maintainer is constructed over these traits and is the only
//! component that writes the Inverted Index and Alias Map. Each operation
//! here is a single read or write against the backing store; retries are
//! the caller's concern, the stores perform none themselves.

use async_trait::async_trait;
use thiserror::Error;

use aviary_core::models::{MediaRecord, SpeciesEntry};

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Object delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid object URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Primary Store: one record per media item, keyed by canonical URL.
/// Source of truth for tag counts and metadata.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, url: &str) -> StoreResult<Option<MediaRecord>>;

    /// Full-record upsert (put semantics, last writer wins).
    async fn put(&self, record: MediaRecord) -> StoreResult<()>;

    /// Returns whether a record existed.
    async fn delete(&self, url: &str) -> StoreResult<bool>;
}

/// Inverted Index: entries keyed by `(species, media url)`.
#[async_trait]
pub trait SpeciesIndex: Send + Sync {
    /// Upsert an entry under its composite key. Writing an unchanged entry
    /// is a no-op in observable effect.
    async fn put_entry(&self, entry: SpeciesEntry) -> StoreResult<()>;

    /// Delete the entry for `(species, media url)`; missing entries are fine.
    async fn delete_entry(&self, species: &str, media_url: &str) -> StoreResult<()>;

    /// All entries for one species.
    async fn query_species(&self, species: &str) -> StoreResult<Vec<SpeciesEntry>>;

    /// Full index scan filtered by media URL. O(index size); the delete
    /// fallback for records that disappeared out of order. Not a query path.
    async fn scan_by_media(&self, media_url: &str) -> StoreResult<Vec<SpeciesEntry>>;
}

/// Alias Map: secondary (thumbnail) identifier to canonical media URL.
/// Entries are created once and never re-pointed.
#[async_trait]
pub trait AliasMap: Send + Sync {
    async fn get(&self, thumbnail_url: &str) -> StoreResult<Option<String>>;

    async fn put(&self, thumbnail_url: &str, media_url: &str) -> StoreResult<()>;

    /// Returns whether an entry existed.
    async fn delete(&self, thumbnail_url: &str) -> StoreResult<bool>;

    /// Reverse lookup: the alias key pointing at `media_url`, if any.
    /// O(map size) value scan, used only when the owning record is already
    /// gone and its thumbnail URL is unknown.
    async fn find_by_canonical(&self, media_url: &str) -> StoreResult<Option<String>>;
}

/// External object storage (the media bytes themselves). The catalog only
/// ever deletes; upload and thumbnail generation are other services.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Delete `key` from `bucket`. An already-missing object is success.
    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()>;
}
