//! UpdateThresholdHandler - edits a level in place.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, DegreeId, OutcomeTier, ThresholdId};
use crate::domain::threshold::{Threshold, ThresholdDraft};
use crate::ports::ThresholdStore;

use super::ThresholdCommandError;

/// Command to update a threshold.
#[derive(Debug, Clone)]
pub struct UpdateThresholdCommand {
    pub id: ThresholdId,
    pub degree_id: DegreeId,
    pub tier: OutcomeTier,
    pub level_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub is_attained: bool,
}

/// Handler for threshold updates.
pub struct UpdateThresholdHandler {
    threshold_store: Arc<dyn ThresholdStore>,
}

impl UpdateThresholdHandler {
    pub fn new(threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self { threshold_store }
    }

    /// Validates fields and applies the draft.
    ///
    /// The overlap re-check excludes the record itself, so narrowing or
    /// renaming a level never conflicts with its own old range.
    pub async fn handle(
        &self,
        cmd: UpdateThresholdCommand,
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

        let threshold = self.threshold_store.update(cmd.id, &draft).await?;

        info!(
            threshold_id = %threshold.id(),
            level = threshold.level_name(),
            user = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            "threshold updated"
        );

        Ok(threshold)
    }
}
