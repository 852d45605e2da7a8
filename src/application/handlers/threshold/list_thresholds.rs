//! ListThresholdsHandler - one group, ordered for display.

use std::sync::Arc;

use crate::domain::foundation::{DegreeId, OutcomeTier};
use crate::domain::threshold::Threshold;
use crate::ports::ThresholdStore;

use super::ThresholdCommandError;

/// Query for one (degree, tier) threshold group.
#[derive(Debug, Clone, Copy)]
pub struct ListThresholdsQuery {
    pub degree_id: DegreeId,
    pub tier: OutcomeTier,
}

/// Handler for threshold listing.
pub struct ListThresholdsHandler {
    threshold_store: Arc<dyn ThresholdStore>,
}

impl ListThresholdsHandler {
    pub fn new(threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self { threshold_store }
    }

    /// Returns the group ordered by min ascending.
    pub async fn handle(
        &self,
        query: ListThresholdsQuery,
    ) -> Result<Vec<Threshold>, ThresholdCommandError> {
        Ok(self
            .threshold_store
            .load_group(query.degree_id, query.tier)
            .await?)
    }
}
