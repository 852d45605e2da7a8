//! CreateThresholdHandler - adds a level to a threshold group.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, DegreeId, OutcomeTier};
use crate::domain::threshold::{Threshold, ThresholdDraft};
use crate::ports::ThresholdStore;

use super::ThresholdCommandError;

/// Command to create a threshold.
#[derive(Debug, Clone)]
pub struct CreateThresholdCommand {
    pub degree_id: DegreeId,
    pub tier: OutcomeTier,
    pub level_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub is_attained: bool,
}

/// Handler for threshold creation.
pub struct CreateThresholdHandler {
    threshold_store: Arc<dyn ThresholdStore>,
}

impl CreateThresholdHandler {
    pub fn new(threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self { threshold_store }
    }

    /// Validates fields and inserts the threshold.
    ///
    /// The store re-checks range overlap against the rest of the group
    /// inside its transaction; an `Overlap` error carries the
    /// conflicting thresholds so the caller can correct the input.
    pub async fn handle(
        &self,
        cmd: CreateThresholdCommand,
        metadata: CommandMetadata,
    ) -> Result<Threshold, ThresholdCommandError> {
        let draft = ThresholdDraft::new(
            cmd.degree_id,
            cmd.tier,
            cmd.level_name,
            cmd.min_percentage,
            cmd.max_percentage,
            cmd.is_attained,
        )?;

        let threshold = self.threshold_store.insert(&draft).await?;

        info!(
            threshold_id = %threshold.id(),
            degree = %threshold.degree_id(),
            tier = %threshold.tier(),
            level = threshold.level_name(),
            user = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            "threshold created"
        );

        Ok(threshold)
    }
}
