//! Outcome module - outcome nodes and the mapping graph between tiers.

mod graph;
mod mapping;
mod outcome;

pub use graph::{Axis, MatrixCoverage, OutcomeGraph};
pub use mapping::Mapping;
pub use outcome::Outcome;
