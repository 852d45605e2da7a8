//! Outcome tier enumeration and tier-pair adjacency.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, ErrorCode};

/// The three outcome tiers of the OBE hierarchy.
///
/// The same three-member set classifies attainment thresholds, so this
/// enum also serves as the threshold group type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeTier {
    /// Program Educational Objective (degree scope).
    Peo,
    /// Program Learning Outcome (degree scope).
    Plo,
    /// Course Learning Outcome (course-offering scope).
    Clo,
}

impl OutcomeTier {
    /// All tiers in hierarchy order, highest first.
    pub fn all() -> &'static [OutcomeTier] {
        &[OutcomeTier::Peo, OutcomeTier::Plo, OutcomeTier::Clo]
    }

    /// Whether a mapping edge may connect this tier to `other`.
    ///
    /// Only adjacent tiers map: PEO-PLO and PLO-CLO.
    pub fn is_adjacent_to(&self, other: OutcomeTier) -> bool {
        matches!(
            (self, other),
            (OutcomeTier::Peo, OutcomeTier::Plo)
                | (OutcomeTier::Plo, OutcomeTier::Peo)
                | (OutcomeTier::Plo, OutcomeTier::Clo)
                | (OutcomeTier::Clo, OutcomeTier::Plo)
        )
    }

    /// Stable storage/wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeTier::Peo => "peo",
            OutcomeTier::Plo => "plo",
            OutcomeTier::Clo => "clo",
        }
    }

    /// Parses a storage/wire label.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "peo" => Ok(OutcomeTier::Peo),
            "plo" => Ok(OutcomeTier::Plo),
            "clo" => Ok(OutcomeTier::Clo),
            _ => Err(DomainError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid outcome tier: {}", s),
            )),
        }
    }
}

impl fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// An adjacent pair of tiers forming one mapping matrix.
///
/// The first tier of the pair is the matrix row axis (the higher tier),
/// the second the column axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierPair {
    /// PEO rows against PLO columns.
    PeoPlo,
    /// PLO rows against CLO columns.
    PloClo,
}

impl TierPair {
    /// Builds a pair from two tiers, normalizing order.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if the tiers are not adjacent
    pub fn from_tiers(a: OutcomeTier, b: OutcomeTier) -> Result<Self, DomainError> {
        match (a, b) {
            (OutcomeTier::Peo, OutcomeTier::Plo) | (OutcomeTier::Plo, OutcomeTier::Peo) => {
                Ok(TierPair::PeoPlo)
            }
            (OutcomeTier::Plo, OutcomeTier::Clo) | (OutcomeTier::Clo, OutcomeTier::Plo) => {
                Ok(TierPair::PloClo)
            }
            _ => Err(DomainError::new(
                ErrorCode::InvalidReference,
                format!("Tiers {} and {} are not adjacent", a, b),
            )),
        }
    }

    /// The row-axis (higher) tier.
    pub fn row_tier(&self) -> OutcomeTier {
        match self {
            TierPair::PeoPlo => OutcomeTier::Peo,
            TierPair::PloClo => OutcomeTier::Plo,
        }
    }

    /// The column-axis (lower) tier.
    pub fn column_tier(&self) -> OutcomeTier {
        match self {
            TierPair::PeoPlo => OutcomeTier::Plo,
            TierPair::PloClo => OutcomeTier::Clo,
        }
    }

    /// Stable storage/wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TierPair::PeoPlo => "peo-plo",
            TierPair::PloClo => "plo-clo",
        }
    }

    /// Parses a storage/wire label.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "peo-plo" => Ok(TierPair::PeoPlo),
            "plo-clo" => Ok(TierPair::PloClo),
            _ => Err(DomainError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid tier pair: {}", s),
            )),
        }
    }
}

impl fmt::Display for TierPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row_tier(), self.column_tier())
    }
}
