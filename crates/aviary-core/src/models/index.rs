use serde::{Deserialize, Serialize};

use super::media::{MediaKind, MediaRecord};

/// Inverted Index entry, one per `(species, media url)` pair.
///
/// `count` must equal the owning record's count for that species; an entry
/// exists if and only if the record's tag map contains the species with a
/// count above zero. `kind` and `thumbnail_url` are denormalized copies taken
/// at write time so queries never join against the Primary Store; they may be
/// briefly stale and are repaired by the next reconciliation of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub species: String,
    pub media_url: String,
    pub count: u32,
    pub kind: Option<MediaKind>,
    pub thumbnail_url: Option<String>,
}

impl SpeciesEntry {
    /// Build the entry for `species` from the owning record, or `None` when
    /// the record does not carry that species (in which case any existing
    /// entry must be deleted instead).
    pub fn from_record(species: &str, record: &MediaRecord) -> Option<Self> {
        record.tags.get(species).map(|count| SpeciesEntry {
            species: species.to_string(),
            media_url: record.url.clone(),
            count: *count,
            kind: record.kind,
            thumbnail_url: record.thumbnail_url.clone(),
        })
    }

    /// The identifier search results expose: images resolve to their
    /// thumbnail when one exists, everything else to the canonical URL.
    pub fn resolved_link(&self) -> &str {
        match (self.kind, self.thumbnail_url.as_deref()) {
            (Some(MediaKind::Image), Some(thumb)) => thumb,
            _ => &self.media_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::TagCounts;

    #[test]
    fn test_from_record_copies_count_and_denormalized_fields() {
        let mut tags = TagCounts::new();
        tags.insert("crow".to_string(), 2);
        let record = MediaRecord {
            url: "https://b.s3.amazonaws.com/media/a.jpg".to_string(),
            kind: Some(MediaKind::Image),
            tags,
            thumbnail_url: Some("https://b.s3.amazonaws.com/thumbs/a.jpg".to_string()),
        };

        let entry = SpeciesEntry::from_record("crow", &record).unwrap();
        assert_eq!(entry.count, 2);
        assert_eq!(entry.kind, Some(MediaKind::Image));
        assert_eq!(entry.resolved_link(), "https://b.s3.amazonaws.com/thumbs/a.jpg");

        assert!(SpeciesEntry::from_record("pigeon", &record).is_none());
    }
}
