//! GetMatrixHandler - full matrix view for presentation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MatrixScope, TierPair};
use crate::domain::outcome::{Mapping, MatrixCoverage, Outcome, OutcomeGraph};
use crate::ports::OutcomeStore;

use super::MappingError;

/// Query for one mapping matrix.
#[derive(Debug, Clone)]
pub struct GetMatrixQuery {
    pub pair: TierPair,
    pub scope: MatrixScope,
}

/// The matrix as presented to clients: both axes, the active edge set,
/// and per-axis coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixView {
    pub pair: TierPair,
    pub rows: Vec<Outcome>,
    pub columns: Vec<Outcome>,
    pub mappings: Vec<Mapping>,
    pub row_coverage: Vec<MatrixCoverage>,
    pub column_coverage: Vec<MatrixCoverage>,
}

/// Handler for matrix queries.
pub struct GetMatrixHandler {
    outcome_store: Arc<dyn OutcomeStore>,
}

impl GetMatrixHandler {
    pub fn new(outcome_store: Arc<dyn OutcomeStore>) -> Self {
        Self { outcome_store }
    }

    pub async fn handle(&self, query: GetMatrixQuery) -> Result<MatrixView, MappingError> {
        query.scope.check_pair(query.pair)?;

        // Both axes and the edge set are independent reads.
        let (rows, columns, mappings) = futures::try_join!(
            self.outcome_store
                .load_outcomes(query.pair.row_tier(), &query.scope),
            self.outcome_store
                .load_outcomes(query.pair.column_tier(), &query.scope),
            self.outcome_store.load_mappings(query.pair, &query.scope),
        )?;

        let graph = OutcomeGraph::new(rows, columns, mappings);
        Ok(MatrixView {
            pair: query.pair,
            rows: graph.rows().to_vec(),
            columns: graph.columns().to_vec(),
            mappings: graph.mappings(),
            row_coverage: graph.per_row_coverage(),
            column_coverage: graph.per_column_coverage(),
        })
    }
}
