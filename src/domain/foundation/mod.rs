//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the OBE Hub domain.

mod command;
mod errors;
mod ids;
mod percent;
mod scope;
mod tier;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseOfferingId, DegreeId, OutcomeId, SurveyId, ThresholdId, UserId};
pub use percent::Percent;
pub use scope::MatrixScope;
pub use tier::{OutcomeTier, TierPair};
pub use timestamp::Timestamp;
