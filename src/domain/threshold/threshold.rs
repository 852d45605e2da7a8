//! Threshold entity - a named attainment level over a percentage range.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DegreeId, OutcomeTier, Percent, ThresholdId, Timestamp, ValidationError,
};

/// Maximum length for a threshold level name.
pub const MAX_LEVEL_NAME_LENGTH: usize = 100;

/// Validated field set for creating or updating a threshold.
///
/// # Invariants
///
/// - `level_name` is 1-100 characters
/// - `0 <= min <= max <= 100`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDraft {
    pub degree_id: DegreeId,
    pub tier: OutcomeTier,
    pub level_name: String,
    pub min: Percent,
    pub max: Percent,
    pub is_attained: bool,
}

impl ThresholdDraft {
    /// Validates raw input into a draft.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the level name is blank
    /// - `InvalidFormat` if the level name is too long
    /// - `OutOfRange` if a bound falls outside [0, 100]
    /// - `InvalidFormat` if min exceeds max
    pub fn new(
        degree_id: DegreeId,
        tier: OutcomeTier,
        level_name: impl Into<String>,
        min: f64,
        max: f64,
        is_attained: bool,
    ) -> Result<Self, ValidationError> {
        let level_name = level_name.into();
        if level_name.trim().is_empty() {
            return Err(ValidationError::empty_field("level_name"));
        }
        if level_name.len() > MAX_LEVEL_NAME_LENGTH {
            return Err(ValidationError::invalid_format(
                "level_name",
                format!("exceeds {} characters", MAX_LEVEL_NAME_LENGTH),
            ));
        }

        let min = Percent::try_new(min)
            .map_err(|_| ValidationError::out_of_range("min_percentage", 0.0, 100.0, min))?;
        let max = Percent::try_new(max)
            .map_err(|_| ValidationError::out_of_range("max_percentage", 0.0, 100.0, max))?;
        if min > max {
            return Err(ValidationError::invalid_format(
                "min_percentage",
                "min must not exceed max",
            ));
        }

        Ok(Self {
            degree_id,
            tier,
            level_name,
            min,
            max,
            is_attained,
        })
    }
}

/// A persisted attainment threshold.
///
/// Belongs to exactly one (degree, tier) group. Within a group, ranges
/// are closed intervals that may touch at a boundary but never properly
/// intersect; the lower range owns a shared boundary because
/// classification scans ascending by min.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    id: ThresholdId,
    degree_id: DegreeId,
    tier: OutcomeTier,
    level_name: String,
    min: Percent,
    max: Percent,
    is_attained: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Threshold {
    /// Creates a new threshold from a validated draft.
    pub fn new(id: ThresholdId, draft: ThresholdDraft) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            degree_id: draft.degree_id,
            tier: draft.tier,
            level_name: draft.level_name,
            min: draft.min,
            max: draft.max,
            is_attained: draft.is_attained,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a threshold from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ThresholdId,
        degree_id: DegreeId,
        tier: OutcomeTier,
        level_name: String,
        min: Percent,
        max: Percent,
        is_attained: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            degree_id,
            tier,
            level_name,
            min,
            max,
            is_attained,
            created_at,
            updated_at,
        }
    }

    /// Applies a validated draft to an existing threshold.
    pub fn apply(&mut self, draft: ThresholdDraft) {
        self.degree_id = draft.degree_id;
        self.tier = draft.tier;
        self.level_name = draft.level_name;
        self.min = draft.min;
        self.max = draft.max;
        self.is_attained = draft.is_attained;
        self.updated_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ThresholdId {
        self.id
    }

    pub fn degree_id(&self) -> DegreeId {
        self.degree_id
    }

    pub fn tier(&self) -> OutcomeTier {
        self.tier
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn min(&self) -> Percent {
        self.min
    }

    pub fn max(&self) -> Percent {
        self.max
    }

    pub fn is_attained(&self) -> bool {
        self.is_attained
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whether the closed range [min, max] contains a score.
    pub fn contains(&self, score: f64) -> bool {
        self.min.value() <= score && score <= self.max.value()
    }

    /// Width of the range (max - min).
    pub fn width(&self) -> f64 {
        self.max.value() - self.min.value()
    }
}
