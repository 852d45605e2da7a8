//! Shared mock outcome store for mapping handler tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{MatrixScope, OutcomeId, OutcomeTier, TierPair};
use crate::domain::outcome::{Mapping, Outcome};
use crate::ports::{OutcomeStore, OutcomeStoreError};

/// In-memory store over a fixed outcome set.
///
/// Degree 1 (course offering 7) holds PEOs 1-2, PLOs 10-12 and CLOs
/// 20-21; any other degree is an unknown scope.
pub struct MockOutcomeStore {
    edges: Mutex<HashSet<(TierPair, Mapping)>>,
    fail_with_timeout: bool,
}

impl MockOutcomeStore {
    pub fn standard() -> Self {
        Self {
            edges: Mutex::new(HashSet::new()),
            fail_with_timeout: false,
        }
    }

    pub fn timing_out() -> Self {
        Self {
            edges: Mutex::new(HashSet::new()),
            fail_with_timeout: true,
        }
    }

    pub fn with_edges(edges: Vec<(TierPair, Mapping)>) -> Self {
        Self {
            edges: Mutex::new(edges.into_iter().collect()),
            fail_with_timeout: false,
        }
    }

    fn outcomes_of(tier: OutcomeTier) -> Vec<Outcome> {
        let ids: &[i64] = match tier {
            OutcomeTier::Peo => &[1, 2],
            OutcomeTier::Plo => &[10, 11, 12],
            OutcomeTier::Clo => &[20, 21],
        };
        ids.iter()
            .map(|id| {
                Outcome::new(
                    OutcomeId::new(*id),
                    tier,
                    format!("{}-{}", tier, id),
                    format!("Outcome {}", id),
                    None,
                )
            })
            .collect()
    }

    fn check_scope(scope: &MatrixScope) -> Result<(), OutcomeStoreError> {
        if scope.degree_id.value() != 1 {
            return Err(OutcomeStoreError::ScopeNotFound(scope.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for MockOutcomeStore {
    async fn load_outcomes(
        &self,
        tier: OutcomeTier,
        scope: &MatrixScope,
    ) -> Result<Vec<Outcome>, OutcomeStoreError> {
        if self.fail_with_timeout {
            return Err(OutcomeStoreError::Timeout);
        }
        Self::check_scope(scope)?;
        Ok(Self::outcomes_of(tier))
    }

    async fn load_mappings(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
    ) -> Result<Vec<Mapping>, OutcomeStoreError> {
        if self.fail_with_timeout {
            return Err(OutcomeStoreError::Timeout);
        }
        Self::check_scope(scope)?;
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == pair)
            .map(|(_, m)| *m)
            .collect())
    }

    async fn toggle_mapping(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
        mapping: &Mapping,
    ) -> Result<bool, OutcomeStoreError> {
        if self.fail_with_timeout {
            return Err(OutcomeStoreError::Timeout);
        }
        Self::check_scope(scope)?;

        let rows = Self::outcomes_of(pair.row_tier());
        let columns = Self::outcomes_of(pair.column_tier());
        if !rows.iter().any(|o| o.id == mapping.source) {
            return Err(OutcomeStoreError::InvalidReference(mapping.source));
        }
        if !columns.iter().any(|o| o.id == mapping.target) {
            return Err(OutcomeStoreError::InvalidReference(mapping.target));
        }

        let mut edges = self.edges.lock().unwrap();
        let key = (pair, *mapping);
        if edges.remove(&key) {
            Ok(false)
        } else {
            edges.insert(key);
            Ok(true)
        }
    }
}
