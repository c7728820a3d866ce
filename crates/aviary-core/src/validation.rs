//! Input validation for tag-count maps and the bulk-edit wire format.

use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::media::TagCounts;

/// Normalize a caller-supplied tag-count map into the stored form.
///
/// Negative counts are rejected. Zero counts are treated as absent and
/// dropped, so the returned map only ever holds positive counts. Species
/// names must be non-empty.
pub fn normalize_tag_counts(raw: &BTreeMap<String, i64>) -> Result<TagCounts, AppError> {
    let mut tags = TagCounts::new();
    for (species, count) in raw {
        if species.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Species name must not be empty".to_string(),
            ));
        }
        if *count < 0 {
            return Err(AppError::InvalidInput(format!(
                "Tag count for '{}' must not be negative (got {})",
                species, count
            )));
        }
        if *count == 0 {
            continue;
        }
        tags.insert(species.clone(), *count as u32);
    }
    Ok(tags)
}

/// Parse the bulk-edit wire format for tag deltas: `"species, count"` pairs.
///
/// Deltas must be strictly positive; the operation (increment/decrement)
/// carries the sign.
pub fn parse_tag_pairs(pairs: &[String]) -> Result<BTreeMap<String, u32>, AppError> {
    let mut deltas = BTreeMap::new();
    for pair in pairs {
        let (species, count) = pair.split_once(',').ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Malformed tag pair '{}', expected 'species, count'",
                pair
            ))
        })?;
        let species = species.trim();
        if species.is_empty() {
            return Err(AppError::InvalidInput(
                "Species name must not be empty".to_string(),
            ));
        }
        let count: u32 = count.trim().parse().map_err(|_| {
            AppError::InvalidInput(format!(
                "Tag pair '{}' has a non-positive or non-integer count",
                pair
            ))
        })?;
        if count == 0 {
            return Err(AppError::InvalidInput(format!(
                "Tag delta for '{}' must be positive",
                species
            )));
        }
        deltas.insert(species.to_string(), count);
    }
    Ok(deltas)
}
