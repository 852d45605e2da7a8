//! The single shared definition of range overlap and score classification.
//!
//! Create, update and reporting all call these functions so there is one
//! tie-break rule in the whole system: closed ranges may touch at a
//! boundary, and the lower range owns the shared value because
//! classification scans ascending by min.

use crate::domain::foundation::ThresholdId;

use super::Threshold;

/// Whether two closed ranges properly intersect.
///
/// Touching boundaries (70-80 and 80-90) do not count as overlapping.
pub fn ranges_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    a_min < b_max && b_min < a_max
}

/// Thresholds in `group` whose range overlaps [min, max].
///
/// `exclude` skips the record being updated so it never conflicts with
/// itself.
pub fn find_conflicts(
    min: f64,
    max: f64,
    group: &[Threshold],
    exclude: Option<ThresholdId>,
) -> Vec<Threshold> {
    group
        .iter()
        .filter(|t| Some(t.id()) != exclude)
        .filter(|t| ranges_overlap(min, max, t.min().value(), t.max().value()))
        .cloned()
        .collect()
}

/// Best-effort classification of a score against a threshold group.
///
/// Returns the first threshold (ascending by min) whose closed range
/// contains the score. Historical data may hold overlapping or gapped
/// groups; classification still answers rather than erroring, so a
/// boundary score shared by two touching ranges lands in the lower one.
pub fn classify(score: f64, group: &[Threshold]) -> Option<&Threshold> {
    let mut ordered: Vec<&Threshold> = group.iter().collect();
    ordered.sort_by(|a, b| {
        a.min()
            .value()
            .partial_cmp(&b.min().value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ordered.into_iter().find(|t| t.contains(score))
}
