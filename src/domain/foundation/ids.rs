//! Strongly-typed identifier value objects.
//!
//! Organizational and curricular entities live in the student information
//! system and carry numeric keys; these newtypes keep the different id
//! spaces from being mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ValidationError;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw numeric key.
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw numeric key.
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for an outcome, unique per tier within its scope.
    OutcomeId
);

numeric_id!(
    /// Unique identifier for a degree program.
    DegreeId
);

numeric_id!(
    /// Unique identifier for a course offering (course + semester).
    CourseOfferingId
);

numeric_id!(
    /// Unique identifier for an indirect-assessment survey.
    SurveyId
);

numeric_id!(
    /// Unique identifier for an attainment threshold.
    ThresholdId
);

/// User identifier (from the upstream auth provider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_id_wraps_and_unwraps() {
        let id = OutcomeId::new(42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn outcome_id_parses_from_string() {
        let id: OutcomeId = "17".parse().unwrap();
        assert_eq!(id.value(), 17);
    }

    #[test]
    fn outcome_id_rejects_non_numeric_string() {
        let result: Result<OutcomeId, _> = "abc".parse();
        assert!(result.is_err());
    }

    #[test]
    fn ids_of_same_value_are_equal() {
        assert_eq!(DegreeId::new(3), DegreeId::new(3));
        assert_ne!(DegreeId::new(3), DegreeId::new(4));
    }

    #[test]
    fn id_serializes_transparently() {
        let id = ThresholdId::new(9);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
    }

    #[test]
    fn id_displays_raw_value() {
        assert_eq!(format!("{}", CourseOfferingId::new(1201)), "1201");
    }

    #[test]
    fn user_id_accepts_non_empty_string() {
        let id = UserId::new("user-123").unwrap();
        assert_eq!(id.as_str(), "user-123");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        let result = UserId::new("");
        assert!(result.is_err());
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }
}
