//! Attainment handlers - aggregation, classification and coverage checks.

mod calculate_direct;
mod calculate_indirect;
#[cfg(test)]
pub(crate) mod tests_support;
mod validate_coverage;

pub use calculate_direct::{CalculateDirectHandler, CalculateDirectQuery};
pub use calculate_indirect::{CalculateIndirectHandler, CalculateIndirectQuery};
pub use validate_coverage::{ValidateCoverageHandler, ValidateCoverageQuery};

use crate::domain::foundation::SurveyId;
use crate::ports::{ScoreStoreError, ThresholdStoreError};

/// Error type shared by the attainment handlers.
#[derive(Debug, thiserror::Error)]
pub enum AttainmentError {
    #[error("Survey not found: {0}")]
    SurveyNotFound(SurveyId),

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<ScoreStoreError> for AttainmentError {
    fn from(err: ScoreStoreError) -> Self {
        match err {
            ScoreStoreError::SurveyNotFound(id) => AttainmentError::SurveyNotFound(id),
            ScoreStoreError::Timeout => AttainmentError::Timeout,
            ScoreStoreError::Database(msg) => AttainmentError::Database(msg),
        }
    }
}

impl From<ThresholdStoreError> for AttainmentError {
    fn from(err: ThresholdStoreError) -> Self {
        match err {
            ThresholdStoreError::Timeout => AttainmentError::Timeout,
            // Threshold lookups here are group loads; the remaining
            // variants only arise on writes.
            other => AttainmentError::Database(other.to_string()),
        }
    }
}
