//! Threshold store port (write side).
//!
//! # Design
//!
//! - **Guarded writes**: insert and update must re-check range overlap
//!   against the rest of the group *inside* the storage transaction,
//!   using `domain::threshold::find_conflicts`, so a concurrent write
//!   cannot slip an overlapping range past the check
//! - **Store-assigned ids**: writes take validated drafts and return
//!   the persisted record
//! - **Group-ordered reads**: `load_group` returns ascending by min

use async_trait::async_trait;

use crate::domain::foundation::{DegreeId, OutcomeTier, ThresholdId};
use crate::domain::threshold::{Threshold, ThresholdDraft};

/// Store port for attainment thresholds.
#[async_trait]
pub trait ThresholdStore: Send + Sync {
    /// Loads one (degree, tier) group, ordered by min ascending.
    async fn load_group(
        &self,
        degree_id: DegreeId,
        tier: OutcomeTier,
    ) -> Result<Vec<Threshold>, ThresholdStoreError>;

    /// Finds a threshold by id. Returns `None` if not found.
    async fn find_by_id(
        &self,
        id: ThresholdId,
    ) -> Result<Option<Threshold>, ThresholdStoreError>;

    /// Inserts a new threshold and returns the persisted record.
    ///
    /// # Errors
    ///
    /// - `Overlap` with the conflicting thresholds if the range properly
    ///   intersects an existing range in the group
    async fn insert(&self, draft: &ThresholdDraft) -> Result<Threshold, ThresholdStoreError>;

    /// Applies a draft to an existing threshold and returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the threshold does not exist
    /// - `Overlap` as for insert, excluding the record itself
    async fn update(
        &self,
        id: ThresholdId,
        draft: &ThresholdDraft,
    ) -> Result<Threshold, ThresholdStoreError>;

    /// Deletes a threshold unconditionally.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the threshold does not exist
    async fn delete(&self, id: ThresholdId) -> Result<(), ThresholdStoreError>;
}

/// Errors surfaced by threshold store implementations.
#[derive(Debug, thiserror::Error)]
pub enum ThresholdStoreError {
    #[error("Threshold not found: {0}")]
    NotFound(ThresholdId),

    #[error("Range overlaps {} existing threshold(s)", conflicts.len())]
    Overlap { conflicts: Vec<Threshold> },

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for ThresholdStoreError {
    fn from(err: sqlx::Error) -> Self {
        ThresholdStoreError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ThresholdStore) {}
    }

    #[test]
    fn overlap_error_reports_conflict_count() {
        let conflict = Threshold::new(
            ThresholdId::new(1),
            ThresholdDraft::new(DegreeId::new(1), OutcomeTier::Plo, "Met", 60.0, 79.0, true)
                .unwrap(),
        );
        let err = ThresholdStoreError::Overlap {
            conflicts: vec![conflict],
        };
        assert!(format!("{}", err).contains("1 existing threshold"));
    }

    #[test]
    fn error_conversion_from_sqlx() {
        let err: ThresholdStoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ThresholdStoreError::Database(_)));
    }
}
