//! ListOutcomesHandler - outcomes of one tier within a scope.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MatrixScope, OutcomeTier};
use crate::domain::outcome::Outcome;
use crate::ports::{OutcomeStore, OutcomeStoreError};

/// Query for the outcomes of one tier.
#[derive(Debug, Clone)]
pub struct ListOutcomesQuery {
    pub tier: OutcomeTier,
    pub scope: MatrixScope,
    /// Optional case-insensitive filter over code and description.
    pub search: Option<String>,
}

/// Error type for outcome queries.
#[derive(Debug, thiserror::Error)]
pub enum OutcomeQueryError {
    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    #[error("{0}")]
    Domain(DomainError),

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<OutcomeStoreError> for OutcomeQueryError {
    fn from(err: OutcomeStoreError) -> Self {
        match err {
            OutcomeStoreError::ScopeNotFound(scope) => OutcomeQueryError::ScopeNotFound(scope),
            OutcomeStoreError::Timeout => OutcomeQueryError::Timeout,
            OutcomeStoreError::InvalidReference(_) | OutcomeStoreError::Database(_) => {
                OutcomeQueryError::Database(err.to_string())
            }
        }
    }
}

impl From<DomainError> for OutcomeQueryError {
    fn from(err: DomainError) -> Self {
        OutcomeQueryError::Domain(err)
    }
}

/// Handler for outcome listing.
pub struct ListOutcomesHandler {
    outcome_store: Arc<dyn OutcomeStore>,
}

impl ListOutcomesHandler {
    pub fn new(outcome_store: Arc<dyn OutcomeStore>) -> Self {
        Self { outcome_store }
    }

    pub async fn handle(
        &self,
        query: ListOutcomesQuery,
    ) -> Result<Vec<Outcome>, OutcomeQueryError> {
        query.scope.check_tier(query.tier)?;

        let mut outcomes = self
            .outcome_store
            .load_outcomes(query.tier, &query.scope)
            .await?;

        if let Some(needle) = query.search.as_deref() {
            let needle = needle.trim();
            if !needle.is_empty() {
                outcomes.retain(|o| o.matches(needle));
            }
        }

        Ok(outcomes)
    }
}
