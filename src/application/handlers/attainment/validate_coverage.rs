//! ValidateCoverageHandler - does a threshold group span [0, 100]?

use std::sync::Arc;

use crate::domain::coverage::{validate_coverage, CoverageReport};
use crate::domain::foundation::{DegreeId, OutcomeTier};
use crate::ports::ThresholdStore;

use super::AttainmentError;

/// Query for one group's coverage report.
#[derive(Debug, Clone, Copy)]
pub struct ValidateCoverageQuery {
    pub degree_id: DegreeId,
    pub tier: OutcomeTier,
}

/// Handler validating threshold coverage of the percentage scale.
pub struct ValidateCoverageHandler {
    threshold_store: Arc<dyn ThresholdStore>,
}

impl ValidateCoverageHandler {
    pub fn new(threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self { threshold_store }
    }

    pub async fn handle(
        &self,
        query: ValidateCoverageQuery,
    ) -> Result<CoverageReport, AttainmentError> {
        let group = self
            .threshold_store
            .load_group(query.degree_id, query.tier)
            .await?;
        Ok(validate_coverage(&group))
    }
}
