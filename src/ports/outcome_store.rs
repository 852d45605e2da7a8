//! Outcome store port - outcome nodes and mapping edges.
//!
//! # Design
//!
//! - **Read side**: pure projections of SIS data, no side effects
//! - **Toggle**: the one mutation; implementations must make the
//!   existence check and the flip atomic so concurrent calls on the
//!   same pair serialize and cannot lose an update

use async_trait::async_trait;

use crate::domain::foundation::{MatrixScope, OutcomeId, OutcomeTier, TierPair};
use crate::domain::outcome::{Mapping, Outcome};

/// Store port for outcomes and the mapping edges between them.
#[async_trait]
pub trait OutcomeStore: Send + Sync {
    /// Loads the outcomes of one tier within a scope, in display order.
    ///
    /// # Errors
    ///
    /// - `ScopeNotFound` if the degree or course offering does not exist
    /// - `Timeout` if the backing store exceeded its deadline
    async fn load_outcomes(
        &self,
        tier: OutcomeTier,
        scope: &MatrixScope,
    ) -> Result<Vec<Outcome>, OutcomeStoreError>;

    /// Loads the active edge set of one matrix within a scope.
    async fn load_mappings(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
    ) -> Result<Vec<Mapping>, OutcomeStoreError>;

    /// Atomically flips one edge and returns its new state.
    ///
    /// The flip is all-or-nothing: implementations run the existence
    /// check and the write in a single storage transaction, so two
    /// concurrent toggles of the same pair serialize and an aborted
    /// request leaves no partial state.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if either endpoint does not exist in the scope
    async fn toggle_mapping(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
        mapping: &Mapping,
    ) -> Result<bool, OutcomeStoreError>;
}

/// Errors surfaced by outcome store implementations.
#[derive(Debug, thiserror::Error)]
pub enum OutcomeStoreError {
    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    #[error("Outcome {0} does not exist in the requested scope")]
    InvalidReference(OutcomeId),

    #[error("Storage call exceeded its deadline")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for OutcomeStoreError {
    fn from(err: sqlx::Error) -> Self {
        OutcomeStoreError::Database(err.to_string())
    }
}
