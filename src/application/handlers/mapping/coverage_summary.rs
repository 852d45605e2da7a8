//! CoverageSummaryHandler - mapping coverage rollup for reporting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MatrixScope, TierPair};
use crate::domain::outcome::{MatrixCoverage, OutcomeGraph};
use crate::ports::OutcomeStore;

use super::MappingError;

/// Query for a matrix coverage summary.
#[derive(Debug, Clone)]
pub struct CoverageSummaryQuery {
    pub pair: TierPair,
    pub scope: MatrixScope,
}

/// Program-level rollup of one matrix, for reporting and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub pair: TierPair,
    pub total_rows: usize,
    pub total_columns: usize,
    pub total_mappings: usize,
    pub per_row_coverage: Vec<MatrixCoverage>,
    pub per_column_coverage: Vec<MatrixCoverage>,
}

/// Handler for coverage summary queries.
pub struct CoverageSummaryHandler {
    outcome_store: Arc<dyn OutcomeStore>,
}

impl CoverageSummaryHandler {
    pub fn new(outcome_store: Arc<dyn OutcomeStore>) -> Self {
        Self { outcome_store }
    }

    pub async fn handle(
        &self,
        query: CoverageSummaryQuery,
    ) -> Result<CoverageSummary, MappingError> {
        query.scope.check_pair(query.pair)?;

        let (rows, columns, mappings) = futures::try_join!(
            self.outcome_store
                .load_outcomes(query.pair.row_tier(), &query.scope),
            self.outcome_store
                .load_outcomes(query.pair.column_tier(), &query.scope),
            self.outcome_store.load_mappings(query.pair, &query.scope),
        )?;

        let graph = OutcomeGraph::new(rows, columns, mappings);
        Ok(CoverageSummary {
            pair: query.pair,
            total_rows: graph.rows().len(),
            total_columns: graph.columns().len(),
            total_mappings: graph.total_mappings(),
            per_row_coverage: graph.per_row_coverage(),
            per_column_coverage: graph.per_column_coverage(),
        })
    }
}
