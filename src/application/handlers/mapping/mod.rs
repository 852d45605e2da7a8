//! Mapping matrix handlers - toggle and coverage queries.

mod coverage_summary;
mod get_matrix;
#[cfg(test)]
pub(crate) mod tests_support;
mod toggle_mapping;

pub use coverage_summary::{CoverageSummary, CoverageSummaryHandler, CoverageSummaryQuery};
pub use get_matrix::{GetMatrixHandler, GetMatrixQuery, MatrixView};
pub use toggle_mapping::{ToggleMappingCommand, ToggleMappingHandler, ToggleMappingResult};

use crate::domain::foundation::{DomainError, OutcomeId};
use crate::ports::OutcomeStoreError;

/// Error type shared by the mapping handlers.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    #[error("Outcome {0} does not exist in the requested scope")]
    InvalidReference(OutcomeId),

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("{0}")]
    Domain(DomainError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<OutcomeStoreError> for MappingError {
    fn from(err: OutcomeStoreError) -> Self {
        match err {
            OutcomeStoreError::ScopeNotFound(scope) => MappingError::ScopeNotFound(scope),
            OutcomeStoreError::InvalidReference(id) => MappingError::InvalidReference(id),
            OutcomeStoreError::Timeout => MappingError::Timeout,
            OutcomeStoreError::Database(msg) => MappingError::Database(msg),
        }
    }
}

impl From<DomainError> for MappingError {
    fn from(err: DomainError) -> Self {
        MappingError::Domain(err)
    }
}
