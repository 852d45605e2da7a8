//! Matrix scope - the owning context a matrix is resolved against.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CourseOfferingId, DegreeId, DomainError, ErrorCode, OutcomeTier, TierPair};

/// The owning scope for outcomes on both axes of a matrix.
///
/// PEOs and PLOs belong to a degree; CLOs belong to a course offering,
/// which in turn belongs to the degree. `course_id` is therefore required
/// whenever the CLO tier is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixScope {
    pub degree_id: DegreeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseOfferingId>,
}

impl MatrixScope {
    /// Scope for degree-level tiers (PEO, PLO).
    pub fn degree(degree_id: DegreeId) -> Self {
        Self {
            degree_id,
            course_id: None,
        }
    }

    /// Scope including a course offering, for CLO access.
    pub fn course(degree_id: DegreeId, course_id: CourseOfferingId) -> Self {
        Self {
            degree_id,
            course_id: Some(course_id),
        }
    }

    /// Checks this scope can resolve outcomes of the given tier.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if the CLO tier is requested without a course
    pub fn check_tier(&self, tier: OutcomeTier) -> Result<(), DomainError> {
        if tier == OutcomeTier::Clo && self.course_id.is_none() {
            return Err(DomainError::new(
                ErrorCode::InvalidReference,
                "CLO outcomes require a course offering in the scope",
            ));
        }
        Ok(())
    }

    /// Checks this scope can resolve both axes of the given pair.
    pub fn check_pair(&self, pair: TierPair) -> Result<(), DomainError> {
        self.check_tier(pair.row_tier())?;
        self.check_tier(pair.column_tier())
    }
}

impl fmt::Display for MatrixScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.course_id {
            Some(course) => write!(f, "degree {} / course {}", self.degree_id, course),
            None => write!(f, "degree {}", self.degree_id),
        }
    }
}
