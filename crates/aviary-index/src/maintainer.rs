//! Index maintainer: upsert, bulk tag edit, and delete.
//!
//! Every mutation is a read-then-write sequence against the Primary Store
//! followed by reconciliation of the Inverted Index. There is no locking or
//! versioning: concurrent writers to the same media URL race and the last
//! write wins, per id. Operations on different URLs are independent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aviary_core::models::{MediaKind, MediaRecord, SpeciesEntry, TagCounts};
use aviary_core::validation::normalize_tag_counts;
use aviary_core::{AppError, ErrorMetadata};
use aviary_store::keys::split_bucket_key;
use aviary_store::{AliasMap, ObjectStorage, RecordStore, SpeciesIndex, StoreError};

/// Map a store failure into the application error taxonomy.
fn store_err(err: StoreError) -> AppError {
    match err {
        StoreError::Unavailable(msg) => AppError::Store(msg),
        StoreError::DeleteFailed(msg) => AppError::ObjectStorage(msg),
        StoreError::InvalidUrl(msg) => AppError::InvalidInput(msg),
        StoreError::ConfigError(msg) => AppError::Internal(msg),
    }
}

/// Derived thumbnails are named by the upload pipeline with a `thumb`
/// segment. An identifier that looks like one but has no alias mapping is a
/// dangling secondary id, not an unknown canonical record.
fn is_derived_thumbnail_url(url: &str) -> bool {
    url.contains("thumb")
}

/// Complete replacement payload for one media item, as produced by the
/// tagging pipeline. `tags` is the full tag-count map, never a delta.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertRequest {
    pub url: String,
    pub kind: MediaKind,
    pub tags: BTreeMap<String, i64>,
    pub thumbnail_url: Option<String>,
}

/// What an upsert touched.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpsertOutcome {
    pub url: String,
    /// Species whose index entries were (re)written.
    pub species_updated: Vec<String>,
}

/// Direction of a bulk tag edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BulkEditOp {
    Increment,
    Decrement,
}

/// Per-identifier outcome of a bulk tag edit. Batch members fail
/// independently; a failed member never aborts the rest.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditItemResult {
    pub id: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditItemResult {
    fn ok(id: &str) -> Self {
        EditItemResult {
            id: id.to_string(),
            status: 200,
            error: None,
        }
    }

    fn failed(id: &str, err: &AppError) -> Self {
        EditItemResult {
            id: id.to_string(),
            status: err.http_status_code(),
            error: Some(err.client_message()),
        }
    }
}

/// Per-identifier outcome of a delete.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteItemResult {
    pub id: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteItemResult {
    fn ok(id: &str) -> Self {
        DeleteItemResult {
            id: id.to_string(),
            status: 204,
            error: None,
        }
    }

    fn failed(id: &str, err: &AppError) -> Self {
        DeleteItemResult {
            id: id.to_string(),
            status: err.http_status_code(),
            error: Some(err.client_message()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// The sole writer of the Inverted Index and Alias Map. Constructed over
/// injected store handles; stateless apart from them.
pub struct IndexMaintainer {
    records: Arc<dyn RecordStore>,
    pub(crate) index: Arc<dyn SpeciesIndex>,
    aliases: Arc<dyn AliasMap>,
    objects: Arc<dyn ObjectStorage>,
}

impl IndexMaintainer {
    pub fn new(
        records: Arc<dyn RecordStore>,
        index: Arc<dyn SpeciesIndex>,
        aliases: Arc<dyn AliasMap>,
        objects: Arc<dyn ObjectStorage>,
    ) -> Self {
        IndexMaintainer {
            records,
            index,
            aliases,
            objects,
        }
    }

    /// Upsert a media record from a complete replacement tag map and make
    /// the Inverted Index consistent with it.
    ///
    /// Safe to retry: every step is idempotent given identical inputs.
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn upsert(&self, request: UpsertRequest) -> Result<UpsertOutcome, AppError> {
        let tags = normalize_tag_counts(&request.tags)?;

        let existing = self.records.get(&request.url).await.map_err(store_err)?;
        let old_species: BTreeSet<String> = existing
            .as_ref()
            .map(|r| r.tags.keys().cloned().collect())
            .unwrap_or_default();

        // Write-once thumbnail: keep whatever is already stored, tolerate a
        // late first arrival, never re-point.
        let stored_thumbnail = existing.as_ref().and_then(|r| r.thumbnail_url.clone());
        let thumbnail_url = match (&stored_thumbnail, &request.thumbnail_url) {
            (Some(current), Some(supplied)) if current != supplied => {
                tracing::warn!(
                    url = %request.url,
                    supplied = %supplied,
                    "Ignoring attempt to re-point an already-set thumbnail"
                );
                stored_thumbnail.clone()
            }
            (Some(_), _) => stored_thumbnail.clone(),
            (None, supplied) => supplied.clone(),
        };

        let record = MediaRecord {
            url: request.url.clone(),
            kind: Some(request.kind),
            tags,
            thumbnail_url: thumbnail_url.clone(),
        };
        self.records.put(record.clone()).await.map_err(store_err)?;

        self.reconcile_full(&record, &old_species).await?;

        // Alias creation only when this record's thumbnail matches what the
        // caller sent: a fresh set or an idempotent re-send. A rejected
        // re-point must not touch the map.
        if let (Some(thumb), Some(supplied)) = (&thumbnail_url, &request.thumbnail_url) {
            if thumb == supplied {
                self.aliases
                    .put(thumb, &record.url)
                    .await
                    .map_err(store_err)?;
            }
        }

        Ok(UpsertOutcome {
            url: record.url.clone(),
            species_updated: record.tags.keys().cloned().collect(),
        })
    }

    /// Apply the same per-species deltas to every identifier in `ids`.
    /// Identifiers may be canonical URLs or thumbnail URLs (resolved through
    /// the Alias Map). Members fail independently.
    #[tracing::instrument(skip(self, ids, deltas), fields(ids = ids.len(), op = ?op))]
    pub async fn bulk_tag_edit(
        &self,
        ids: &[String],
        op: BulkEditOp,
        deltas: &BTreeMap<String, u32>,
    ) -> Result<Vec<EditItemResult>, AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one identifier is required".to_string(),
            ));
        }
        if deltas.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one tag delta is required".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let result = match self.edit_one(id, op, deltas).await {
                Ok(()) => EditItemResult::ok(id),
                Err(err) => {
                    tracing::debug!(id = %id, error = %err, "Bulk tag edit member failed");
                    EditItemResult::failed(id, &err)
                }
            };
            results.push(result);
        }
        Ok(results)
    }

    async fn edit_one(
        &self,
        id: &str,
        op: BulkEditOp,
        deltas: &BTreeMap<String, u32>,
    ) -> Result<(), AppError> {
        let canonical = self.resolve_canonical(id).await?;

        let existing = self.records.get(&canonical).await.map_err(store_err)?;
        let mut tags: TagCounts = existing
            .as_ref()
            .map(|r| r.tags.clone())
            .unwrap_or_default();

        for (species, delta) in deltas {
            let old_count = tags.get(species).copied().unwrap_or(0);
            let new_count = match op {
                BulkEditOp::Increment => old_count.saturating_add(*delta),
                BulkEditOp::Decrement => old_count.saturating_sub(*delta),
            };
            if new_count == 0 {
                // Zero is never stored; the species key is removed outright.
                tags.remove(species);
            } else {
                tags.insert(species.clone(), new_count);
            }
        }

        let record = MediaRecord {
            url: canonical.clone(),
            kind: existing.as_ref().and_then(|r| r.kind),
            tags,
            thumbnail_url: existing.as_ref().and_then(|r| r.thumbnail_url.clone()),
        };
        self.records.put(record.clone()).await.map_err(store_err)?;

        // Only the touched species can have changed; reconcile exactly those.
        for species in deltas.keys() {
            match SpeciesEntry::from_record(species, &record) {
                Some(entry) => self.index.put_entry(entry).await.map_err(store_err)?,
                None => self
                    .index
                    .delete_entry(species, &record.url)
                    .await
                    .map_err(store_err)?,
            }
        }
        Ok(())
    }

    /// Delete media items and every derived artifact referencing them.
    /// The external storage object is attempted first; its failure is logged
    /// and never blocks removal of local state, so the catalog cannot end up
    /// pointing at objects that are already gone.
    #[tracing::instrument(skip(self, ids), fields(ids = ids.len()))]
    pub async fn delete(&self, ids: &[String]) -> Result<Vec<DeleteItemResult>, AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one identifier is required".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let result = match self.delete_one(id).await {
                Ok(()) => DeleteItemResult::ok(id),
                Err(err) => {
                    tracing::debug!(id = %id, error = %err, "Delete member failed");
                    DeleteItemResult::failed(id, &err)
                }
            };
            results.push(result);
        }
        Ok(results)
    }

    async fn delete_one(&self, id: &str) -> Result<(), AppError> {
        let (bucket, key) = split_bucket_key(id).map_err(store_err)?;

        if let Err(err) = self.objects.delete_object(&bucket, &key).await {
            tracing::warn!(
                id = %id,
                error = %err,
                "External object delete failed; removing catalog state anyway"
            );
        }

        // Secondary identifier: drop the alias entry, leave the record.
        if self.aliases.delete(id).await.map_err(store_err)? {
            return Ok(());
        }
        if is_derived_thumbnail_url(id) {
            // Dangling thumbnail id; nothing left to remove locally.
            return Ok(());
        }

        // Canonical identifier: cascade.
        let record = self.records.get(id).await.map_err(store_err)?;
        match &record {
            Some(record) => {
                let species: Vec<String> = record.species().map(String::from).collect();
                for s in &species {
                    self.index.delete_entry(s, id).await.map_err(store_err)?;
                }
                self.records.delete(id).await.map_err(store_err)?;
            }
            None => {
                // Record already gone (deleted out of order): the species set
                // is unknown, so fall back to scanning the whole index for
                // this media URL. O(index size) - last resort only.
                tracing::warn!(
                    id = %id,
                    "Record missing during delete; scanning index for orphaned entries"
                );
                let orphaned = self.index.scan_by_media(id).await.map_err(store_err)?;
                for entry in orphaned {
                    self.index
                        .delete_entry(&entry.species, id)
                        .await
                        .map_err(store_err)?;
                }
            }
        }

        // Remove the alias pointing at this record, when one exists.
        let alias_key = match record.as_ref().and_then(|r| r.thumbnail_url.clone()) {
            Some(thumb) => Some(thumb),
            None => self.aliases.find_by_canonical(id).await.map_err(store_err)?,
        };
        if let Some(alias_key) = alias_key {
            self.aliases.delete(&alias_key).await.map_err(store_err)?;
        }

        Ok(())
    }

    /// Resolve a caller-supplied identifier to its canonical URL.
    async fn resolve_canonical(&self, id: &str) -> Result<String, AppError> {
        if let Some(canonical) = self.aliases.get(id).await.map_err(store_err)? {
            return Ok(canonical);
        }
        if is_derived_thumbnail_url(id) {
            return Err(AppError::NotFound(format!(
                "Thumbnail URL {} not found in alias map",
                id
            )));
        }
        Ok(id.to_string())
    }

    /// Upsert reconciliation: drop entries for species no longer present,
    /// rewrite entries (count and denormalized fields) for every species
    /// currently on the record.
    async fn reconcile_full(
        &self,
        record: &MediaRecord,
        old_species: &BTreeSet<String>,
    ) -> Result<(), AppError> {
        for species in old_species {
            if !record.tags.contains_key(species) {
                self.index
                    .delete_entry(species, &record.url)
                    .await
                    .map_err(store_err)?;
            }
        }
        for species in record.tags.keys() {
            if let Some(entry) = SpeciesEntry::from_record(species, record) {
                self.index.put_entry(entry).await.map_err(store_err)?;
            }
        }
        Ok(())
    }
}
