//! Multi-criteria search over the Inverted Index.
//!
//! Reads only the Inverted Index; the Primary Store is never consulted at
//! query time. Each criterion produces a set of resolved links and the
//! criteria are ANDed by set intersection.

use std::collections::{BTreeMap, BTreeSet};

use aviary_core::AppError;

use crate::maintainer::IndexMaintainer;

impl IndexMaintainer {
    /// Find media satisfying every `(species, minimum count)` criterion.
    ///
    /// Returns the resolved links (thumbnail for images that have one,
    /// canonical URL otherwise). An empty criteria map is a validation
    /// error; an empty intersection is a normal empty result.
    #[tracing::instrument(skip(self, criteria), fields(criteria = criteria.len()))]
    pub async fn search(
        &self,
        criteria: &BTreeMap<String, i64>,
    ) -> Result<BTreeSet<String>, AppError> {
        if criteria.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one species criterion is required".to_string(),
            ));
        }
        for (species, minimum) in criteria {
            if species.trim().is_empty() {
                return Err(AppError::InvalidInput(
                    "Species name must not be empty".to_string(),
                ));
            }
            if *minimum < 0 {
                return Err(AppError::InvalidInput(format!(
                    "Minimum count for '{}' must not be negative (got {})",
                    species, minimum
                )));
            }
        }

        let mut intersection: Option<BTreeSet<String>> = None;
        for (species, minimum) in criteria {
            let entries = self
                .index
                .query_species(species)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;

            let links: BTreeSet<String> = entries
                .iter()
                .filter(|entry| i64::from(entry.count) >= *minimum)
                .map(|entry| entry.resolved_link().to_string())
                .collect();

            intersection = Some(match intersection {
                // Single criterion: the filtered set is the result as-is.
                None => links,
                Some(acc) => acc.intersection(&links).cloned().collect(),
            });

            // AND semantics: one empty criterion empties the whole result.
            if intersection.as_ref().is_some_and(|links| links.is_empty()) {
                return Ok(BTreeSet::new());
            }
        }

        Ok(intersection.unwrap_or_default())
    }
}
