//! Outcome entity.
//!
//! Outcomes are created and edited by administrative tooling outside this
//! core; here they are read/reference data resolved through the
//! `OutcomeStore` port.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OutcomeId, OutcomeTier};

/// A learning-outcome node on one tier of the OBE hierarchy.
///
/// # Invariants
///
/// - `id` is unique per tier within the owning scope
/// - `code` is the display label, unique within tier + scope
/// - `ordinal` is the Bloom-taxonomy level for CLO/PLO and the sequence
///   number for PEO, when the source system recorded one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: OutcomeId,
    pub tier: OutcomeTier,
    pub code: String,
    pub description: String,
    pub ordinal: Option<i16>,
}

impl Outcome {
    /// Creates an outcome record as loaded from the SIS.
    pub fn new(
        id: OutcomeId,
        tier: OutcomeTier,
        code: impl Into<String>,
        description: impl Into<String>,
        ordinal: Option<i16>,
    ) -> Self {
        Self {
            id,
            tier,
            code: code.into(),
            description: description.into(),
            ordinal,
        }
    }

    /// Case-insensitive match against code or description.
    ///
    /// Used by the outcome listing's search filter.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.code.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
