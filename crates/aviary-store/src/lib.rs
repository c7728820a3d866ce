//! Aviary Store Library
//!
//! This crate provides the storage abstractions behind the catalog: the
//! Primary Store of media records, the per-species Inverted Index, the
//! thumbnail-to-canonical Alias Map, and the external object storage used
//! by delete. Backends are injected as trait objects so the index
//! maintainer never couples to a concrete store; the in-memory backends
//! double as test fakes.

pub mod keys;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use memory::{MemoryAliasMap, MemoryObjectStorage, MemoryRecordStore, MemorySpeciesIndex};
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStorage;
pub use traits::{AliasMap, ObjectStorage, RecordStore, SpeciesIndex, StoreError, StoreResult};
