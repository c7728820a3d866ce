use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

/// Species name to positive observation count, for one media item.
///
/// Invariant: values are always > 0. Zero-count species are removed from the
/// map, never stored. `crate::validation::normalize_tag_counts` is the single
/// entry point that upholds this for caller-supplied counts.
pub type TagCounts = BTreeMap<String, u32>;

/// Primary Store record, one per media item.
///
/// `url` is the canonical identifier: the storage URL of the object, globally
/// unique and immutable once created. `thumbnail_url` is write-once; it
/// tolerates late arrival but is never re-pointed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub url: String,
    /// Absent on records materialized by a bulk edit before any full upsert.
    pub kind: Option<MediaKind>,
    pub tags: TagCounts,
    pub thumbnail_url: Option<String>,
}

impl MediaRecord {
    /// Species currently present in the tag map.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// The identifier callers should link to: images resolve to their
    /// thumbnail when one exists, everything else to the canonical URL.
    pub fn resolved_link(&self) -> &str {
        match (self.kind, self.thumbnail_url.as_deref()) {
            (Some(MediaKind::Image), Some(thumb)) => thumb,
            _ => &self.url,
        }
    }
}
