//! Score store port - raw assessment scores and survey responses.
//!
//! Score collection happens outside this core; both reads are pure
//! projections and may be retried by implementations.

use async_trait::async_trait;

use crate::domain::attainment::{DirectScore, SurveyResponse};
use crate::domain::foundation::{OutcomeId, OutcomeTier, SurveyId};

/// Read-only port for raw score records.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Loads the graded assessment records for one outcome.
    async fn load_scores(
        &self,
        outcome_id: OutcomeId,
    ) -> Result<Vec<DirectScore>, ScoreStoreError>;

    /// Loads the responses of one survey targeting outcomes of a tier.
    ///
    /// # Errors
    ///
    /// - `SurveyNotFound` if the survey does not exist
    async fn load_survey_responses(
        &self,
        survey_id: SurveyId,
        tier: OutcomeTier,
    ) -> Result<Vec<SurveyResponse>, ScoreStoreError>;
}

/// Errors surfaced by score store implementations.
#[derive(Debug, thiserror::Error)]
pub enum ScoreStoreError {
    #[error("Survey not found: {0}")]
    SurveyNotFound(SurveyId),

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for ScoreStoreError {
    fn from(err: sqlx::Error) -> Self {
        ScoreStoreError::Database(err.to_string())
    }
}
