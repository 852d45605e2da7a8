//! Threshold handlers - CRUD with group-wide consistency enforcement.

mod create_threshold;
mod delete_threshold;
mod list_thresholds;
#[cfg(test)]
pub(crate) mod tests_support;
mod update_threshold;

pub use create_threshold::{CreateThresholdCommand, CreateThresholdHandler};
pub use delete_threshold::{DeleteThresholdCommand, DeleteThresholdHandler};
pub use list_thresholds::{ListThresholdsHandler, ListThresholdsQuery};
pub use update_threshold::{UpdateThresholdCommand, UpdateThresholdHandler};

use crate::domain::foundation::{ThresholdId, ValidationError};
use crate::domain::threshold::Threshold;
use crate::ports::ThresholdStoreError;

/// Error type shared by the threshold command handlers.
#[derive(Debug, thiserror::Error)]
pub enum ThresholdCommandError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Threshold not found: {0}")]
    NotFound(ThresholdId),

    #[error("Range overlaps {} existing threshold(s)", conflicts.len())]
    Overlap { conflicts: Vec<Threshold> },

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<ThresholdStoreError> for ThresholdCommandError {
    fn from(err: ThresholdStoreError) -> Self {
        match err {
            ThresholdStoreError::NotFound(id) => ThresholdCommandError::NotFound(id),
            ThresholdStoreError::Overlap { conflicts } => {
                ThresholdCommandError::Overlap { conflicts }
            }
            ThresholdStoreError::Timeout => ThresholdCommandError::Timeout,
            ThresholdStoreError::Database(msg) => ThresholdCommandError::Database(msg),
        }
    }
}
