//! DeleteThresholdHandler - removes a level from a group.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, ThresholdId};
use crate::ports::ThresholdStore;

use super::ThresholdCommandError;

/// Command to delete a threshold.
#[derive(Debug, Clone, Copy)]
pub struct DeleteThresholdCommand {
    pub id: ThresholdId,
}

/// Handler for threshold deletion.
///
/// Deletion is unconditional: attainment results are derived on demand
/// and never persisted, so there is nothing to cascade to.
pub struct DeleteThresholdHandler {
    threshold_store: Arc<dyn ThresholdStore>,
}

impl DeleteThresholdHandler {
    pub fn new(threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self { threshold_store }
    }

    pub async fn handle(
        &self,
        cmd: DeleteThresholdCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ThresholdCommandError> {
        self.threshold_store.delete(cmd.id).await?;

        info!(
            threshold_id = %cmd.id,
            user = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            "threshold deleted"
        );

        Ok(())
    }
}
