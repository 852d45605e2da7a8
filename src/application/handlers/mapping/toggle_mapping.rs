//! ToggleMappingHandler - flips one edge of a mapping matrix.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, MatrixScope, OutcomeId, TierPair};
use crate::domain::outcome::Mapping;
use crate::ports::OutcomeStore;

use super::MappingError;

/// Command to flip the edge between a row and a column outcome.
#[derive(Debug, Clone)]
pub struct ToggleMappingCommand {
    pub pair: TierPair,
    pub scope: MatrixScope,
    pub row_id: OutcomeId,
    pub column_id: OutcomeId,
}

/// Result of a toggle: the edge's new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleMappingResult {
    pub active: bool,
}

/// Handler for toggling mapping edges.
pub struct ToggleMappingHandler {
    outcome_store: Arc<dyn OutcomeStore>,
}

impl ToggleMappingHandler {
    pub fn new(outcome_store: Arc<dyn OutcomeStore>) -> Self {
        Self { outcome_store }
    }

    /// Flips the edge and returns its new state.
    ///
    /// Toggling is idempotent in pairs: two calls restore the original
    /// matrix. The store performs the existence check and the flip in
    /// one transaction, so the call is all-or-nothing.
    pub async fn handle(
        &self,
        cmd: ToggleMappingCommand,
        metadata: CommandMetadata,
    ) -> Result<ToggleMappingResult, MappingError> {
        cmd.scope.check_pair(cmd.pair)?;

        let mapping = Mapping::new(cmd.row_id, cmd.column_id);
        let active = self
            .outcome_store
            .toggle_mapping(cmd.pair, &cmd.scope, &mapping)
            .await?;

        info!(
            pair = %cmd.pair,
            scope = %cmd.scope,
            row = %cmd.row_id,
            column = %cmd.column_id,
            active,
            user = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            "mapping toggled"
        );

        Ok(ToggleMappingResult { active })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::mapping::tests_support::MockOutcomeStore;
    use crate::domain::foundation::{DegreeId, UserId};

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("admin-1").unwrap())
    }

    fn command(row: i64, column: i64) -> ToggleMappingCommand {
        ToggleMappingCommand {
            pair: TierPair::PeoPlo,
            scope: MatrixScope::degree(DegreeId::new(1)),
            row_id: OutcomeId::new(row),
            column_id: OutcomeId::new(column),
        }
    }

    #[tokio::test]
    async fn toggle_activates_a_new_edge() {
        let store = Arc::new(MockOutcomeStore::standard());
        let handler = ToggleMappingHandler::new(store);

        let result = handler.handle(command(1, 10), metadata()).await.unwrap();
        assert!(result.active);
    }

    #[tokio::test]
    async fn second_toggle_deactivates_the_edge() {
        let store = Arc::new(MockOutcomeStore::standard());
        let handler = ToggleMappingHandler::new(store);

        let first = handler.handle(command(1, 10), metadata()).await.unwrap();
        let second = handler.handle(command(1, 10), metadata()).await.unwrap();
        assert!(first.active);
        assert!(!second.active);
    }

    #[tokio::test]
    async fn toggle_rejects_unknown_row() {
        let store = Arc::new(MockOutcomeStore::standard());
        let handler = ToggleMappingHandler::new(store);

        let result = handler.handle(command(99, 10), metadata()).await;
        assert!(matches!(result, Err(MappingError::InvalidReference(id)) if id.value() == 99));
    }

    #[tokio::test]
    async fn toggle_rejects_unknown_column() {
        let store = Arc::new(MockOutcomeStore::standard());
        let handler = ToggleMappingHandler::new(store);

        let result = handler.handle(command(1, 99), metadata()).await;
        assert!(matches!(result, Err(MappingError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn toggle_rejects_clo_pair_without_course_scope() {
        let store = Arc::new(MockOutcomeStore::standard());
        let handler = ToggleMappingHandler::new(store);

        let cmd = ToggleMappingCommand {
            pair: TierPair::PloClo,
            scope: MatrixScope::degree(DegreeId::new(1)),
            row_id: OutcomeId::new(10),
            column_id: OutcomeId::new(20),
        };
        let result = handler.handle(cmd, metadata()).await;
        assert!(matches!(result, Err(MappingError::Domain(_))));
    }

    #[tokio::test]
    async fn toggle_surfaces_store_timeout() {
        let store = Arc::new(MockOutcomeStore::timing_out());
        let handler = ToggleMappingHandler::new(store);

        let result = handler.handle(command(1, 10), metadata()).await;
        assert!(matches!(result, Err(MappingError::Timeout)));
    }
}
