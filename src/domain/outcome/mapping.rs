//! Mapping edge between outcomes on adjacent tiers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OutcomeId;

/// A boolean contribution edge between two outcomes on adjacent tiers.
///
/// The pair is normalized: `source` is always the row-axis (higher-tier)
/// outcome of its matrix and `target` the column-axis one, so two edges
/// connecting the same outcomes always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mapping {
    /// Row-axis outcome (PEO in PEO-PLO, PLO in PLO-CLO).
    pub source: OutcomeId,
    /// Column-axis outcome (PLO in PEO-PLO, CLO in PLO-CLO).
    pub target: OutcomeId,
}

impl Mapping {
    /// Creates an edge between a row outcome and a column outcome.
    pub fn new(source: OutcomeId, target: OutcomeId) -> Self {
        Self { source, target }
    }
}
