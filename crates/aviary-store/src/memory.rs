//! In-memory store backends.
//!
//! Process-local backends for development and tests. Shape matches the
//! production key layout: records by canonical URL, index entries by
//! `(species, media url)`, aliases by thumbnail URL. Cloning shares the
//! underlying maps, so a clone handed to the maintainer observes the same
//! state as the test that created it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use aviary_core::models::{MediaRecord, SpeciesEntry};

use crate::traits::{
    AliasMap, ObjectStorage, RecordStore, SpeciesIndex, StoreError, StoreResult,
};

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
}

/// In-memory Primary Store.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<Mutex<HashMap<String, MediaRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, url: &str) -> StoreResult<Option<MediaRecord>> {
        Ok(lock(&self.records)?.get(url).cloned())
    }

    async fn put(&self, record: MediaRecord) -> StoreResult<()> {
        lock(&self.records)?.insert(record.url.clone(), record);
        Ok(())
    }

    async fn delete(&self, url: &str) -> StoreResult<bool> {
        Ok(lock(&self.records)?.remove(url).is_some())
    }
}

/// In-memory Inverted Index.
#[derive(Clone, Default)]
pub struct MemorySpeciesIndex {
    entries: Arc<Mutex<HashMap<(String, String), SpeciesEntry>>>,
}

impl MemorySpeciesIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entry count across all species (test observability).
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SpeciesIndex for MemorySpeciesIndex {
    async fn put_entry(&self, entry: SpeciesEntry) -> StoreResult<()> {
        lock(&self.entries)?.insert((entry.species.clone(), entry.media_url.clone()), entry);
        Ok(())
    }

    async fn delete_entry(&self, species: &str, media_url: &str) -> StoreResult<()> {
        lock(&self.entries)?.remove(&(species.to_string(), media_url.to_string()));
        Ok(())
    }

    async fn query_species(&self, species: &str) -> StoreResult<Vec<SpeciesEntry>> {
        Ok(lock(&self.entries)?
            .values()
            .filter(|e| e.species == species)
            .cloned()
            .collect())
    }

    async fn scan_by_media(&self, media_url: &str) -> StoreResult<Vec<SpeciesEntry>> {
        Ok(lock(&self.entries)?
            .values()
            .filter(|e| e.media_url == media_url)
            .cloned()
            .collect())
    }
}

/// In-memory Alias Map.
#[derive(Clone, Default)]
pub struct MemoryAliasMap {
    aliases: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryAliasMap {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AliasMap for MemoryAliasMap {
    async fn get(&self, thumbnail_url: &str) -> StoreResult<Option<String>> {
        Ok(lock(&self.aliases)?.get(thumbnail_url).cloned())
    }

    async fn put(&self, thumbnail_url: &str, media_url: &str) -> StoreResult<()> {
        lock(&self.aliases)?.insert(thumbnail_url.to_string(), media_url.to_string());
        Ok(())
    }

    async fn delete(&self, thumbnail_url: &str) -> StoreResult<bool> {
        Ok(lock(&self.aliases)?.remove(thumbnail_url).is_some())
    }

    async fn find_by_canonical(&self, media_url: &str) -> StoreResult<Option<String>> {
        Ok(lock(&self.aliases)?
            .iter()
            .find(|(_, v)| v.as_str() == media_url)
            .map(|(k, _)| k.clone()))
    }
}

/// In-memory object storage. Records every delete so tests can assert the
/// external call was attempted; `fail_next` simulates provider outages.
#[derive(Clone, Default)]
pub struct MemoryObjectStorage {
    deleted: Arc<Mutex<Vec<(String, String)>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(bucket, key)` pairs deleted so far.
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Make the next `delete_object` call fail.
    pub fn fail_next(&self) {
        if let Ok(mut flag) = self.fail_next.lock() {
            *flag = true;
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        {
            let mut flag = lock(&self.fail_next)?;
            if *flag {
                *flag = false;
                return Err(StoreError::DeleteFailed(format!(
                    "simulated failure deleting {}/{}",
                    bucket, key
                )));
            }
        }
        lock(&self.deleted)?.push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviary_core::models::{MediaKind, TagCounts};

    fn sample_record(url: &str) -> MediaRecord {
        let mut tags = TagCounts::new();
        tags.insert("crow".to_string(), 2);
        MediaRecord {
            url: url.to_string(),
            kind: Some(MediaKind::Image),
            tags,
            thumbnail_url: None,
        }
    }

    #[tokio::test]
    async fn test_record_store_roundtrip() {
        let store = MemoryRecordStore::new();
        let url = "https://b.s3.amazonaws.com/media/a.jpg";
        assert!(store.get(url).await.unwrap().is_none());

        store.put(sample_record(url)).await.unwrap();
        assert_eq!(store.get(url).await.unwrap().unwrap().url, url);

        assert!(store.delete(url).await.unwrap());
        assert!(!store.delete(url).await.unwrap());
    }

    #[tokio::test]
    async fn test_species_index_query_and_scan() {
        let index = MemorySpeciesIndex::new();
        let record = sample_record("https://b.s3.amazonaws.com/media/a.jpg");
        let entry = SpeciesEntry::from_record("crow", &record).unwrap();
        index.put_entry(entry.clone()).await.unwrap();
        index.put_entry(entry).await.unwrap(); // idempotent
        assert_eq!(index.len(), 1);

        assert_eq!(index.query_species("crow").await.unwrap().len(), 1);
        assert!(index.query_species("pigeon").await.unwrap().is_empty());
        assert_eq!(
            index.scan_by_media(&record.url).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_alias_map_reverse_lookup() {
        let aliases = MemoryAliasMap::new();
        aliases.put("thumb-url", "canonical-url").await.unwrap();
        assert_eq!(
            aliases.find_by_canonical("canonical-url").await.unwrap(),
            Some("thumb-url".to_string())
        );
        assert!(aliases.delete("thumb-url").await.unwrap());
        assert_eq!(aliases.find_by_canonical("canonical-url").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_object_storage_records_and_fails() {
        let storage = MemoryObjectStorage::new();
        storage.fail_next();
        assert!(storage.delete_object("b", "k").await.is_err());
        storage.delete_object("b", "k").await.unwrap();
        assert_eq!(storage.deleted(), vec![("b".to_string(), "k".to_string())]);
    }
}
