//! Outcome handlers - listing glue over the SIS projection.

mod list_outcomes;

pub use list_outcomes::{ListOutcomesHandler, ListOutcomesQuery, OutcomeQueryError};
