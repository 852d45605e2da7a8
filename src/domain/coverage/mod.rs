//! Coverage analysis over threshold groups - gaps and totals.
//!
//! Levels follow the integer-percent grading convention: consecutive
//! ranges such as 0-59 and 60-79 are contiguous. A gap is only reported
//! when more than one whole percentage point separates two ranges.

use serde::{Deserialize, Serialize};

use crate::domain::threshold::Threshold;

/// Ranges closer than this are contiguous under the grading convention.
const CONTIGUOUS_STEP: f64 = 1.0;

/// An uncovered span of the [0, 100] scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub start: f64,
    pub end: f64,
}

impl Gap {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Result of validating a threshold group's coverage of [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub is_complete: bool,
    pub gaps: Vec<Gap>,
    /// Sum of range widths, capped at 100.
    pub coverage: f64,
}

/// Uncovered spans of [0, 100], ascending.
///
/// A gap is emitted before the first range when its min exceeds 0,
/// between consecutive ranges separated by more than one percentage
/// point, and after the last range when its max falls short of 100.
pub fn find_gaps(thresholds: &[Threshold]) -> Vec<Gap> {
    let mut ordered: Vec<&Threshold> = thresholds.iter().collect();
    ordered.sort_by(|a, b| {
        a.min()
            .value()
            .partial_cmp(&b.min().value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut gaps = Vec::new();
    let Some(first) = ordered.first() else {
        // An empty group covers nothing.
        return vec![Gap {
            start: 0.0,
            end: 100.0,
        }];
    };

    if first.min().value() > 0.0 {
        gaps.push(Gap {
            start: 0.0,
            end: first.min().value(),
        });
    }

    // Track the furthest covered point so nested ranges don't produce
    // phantom gaps.
    let mut covered_to = first.max().value();
    for t in ordered.iter().skip(1) {
        if t.min().value() > covered_to + CONTIGUOUS_STEP {
            gaps.push(Gap {
                start: covered_to,
                end: t.min().value(),
            });
        }
        covered_to = covered_to.max(t.max().value());
    }

    if covered_to < 100.0 {
        gaps.push(Gap {
            start: covered_to,
            end: 100.0,
        });
    }

    gaps
}

/// Sum of range widths across the group, capped at 100.
pub fn total_coverage(thresholds: &[Threshold]) -> f64 {
    let total: f64 = thresholds.iter().map(Threshold::width).sum();
    total.min(100.0)
}

/// Full coverage validation for a threshold group.
pub fn validate_coverage(thresholds: &[Threshold]) -> CoverageReport {
    let gaps = find_gaps(thresholds);
    CoverageReport {
        is_complete: gaps.is_empty(),
        gaps,
        coverage: total_coverage(thresholds),
    }
}
