//! Threshold module - attainment-level ranges per (degree, tier) group.

mod overlap;
mod threshold;

pub use overlap::{classify, find_conflicts, ranges_overlap};
pub use threshold::{Threshold, ThresholdDraft};
