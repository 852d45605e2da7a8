//! Attainment aggregation - raw scores to per-outcome percentages.
//!
//! Everything here is stateless and order-independent: the same input
//! records produce the same attainment regardless of sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OutcomeId, OutcomeTier};

/// One graded assessment record for an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectScore {
    pub student_id: String,
    pub raw_score: f64,
    pub max_score: f64,
}

/// One survey answer scored against an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub respondent_id: String,
    pub outcome_id: OutcomeId,
    pub score: f64,
    pub scale: f64,
}

/// Per-outcome aggregation of survey responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectAttainment {
    pub outcome_id: OutcomeId,
    pub response_count: usize,
    pub average_score: f64,
    pub attainment_percentage: f64,
}

/// Direction of change against a prior period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

/// Change against a prior period's attainment for the same outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// current minus previous, in percentage points.
    pub value: f64,
}

impl Trend {
    /// Compares a current attainment against a prior period's.
    ///
    /// Equal values report `Up` with value 0.
    pub fn compute(current: f64, previous: f64) -> Self {
        let value = current - previous;
        let direction = if current >= previous {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };
        Self { direction, value }
    }
}

/// A computed attainment figure for one outcome, ready for presentation.
///
/// Derived on demand; never persisted by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttainmentResult {
    pub outcome_id: OutcomeId,
    pub tier: OutcomeTier,
    /// Survey or assessment the scores came from.
    pub source_id: i64,
    /// None when there were no measurements, which is distinct from 0%.
    pub attainment_percentage: Option<f64>,
    pub matched_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

/// Level label attached when no threshold range contains the score.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Mean of score ratios across graded records, as a percentage.
///
/// # Edge Cases
/// - Empty input: `None` - an outcome with zero measurements has no
///   attainment, which is not the same as 0% attainment
/// - Records with `max_score <= 0` are skipped; if none remain the
///   result is likewise `None`
pub fn aggregate_direct(scores: &[DirectScore]) -> Option<f64> {
    // Each record is normalized to a percentage before averaging so
    // integer score/max pairs stay exact (8/10 is 80, never 80.000...01).
    let percentages: Vec<f64> = scores
        .iter()
        .filter(|s| s.max_score > 0.0)
        .map(|s| s.raw_score * 100.0 / s.max_score)
        .collect();
    if percentages.is_empty() {
        return None;
    }
    Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
}

/// Groups survey responses by outcome and aggregates each group.
///
/// `attainment_percentage` is the mean of per-response `score/scale`
/// ratios times 100, which equals `average_score / scale * 100` whenever
/// the scale is uniform across the group. Responses with `scale <= 0`
/// are skipped. Output is ordered by outcome id.
pub fn aggregate_indirect(responses: &[SurveyResponse]) -> Vec<IndirectAttainment> {
    let mut by_outcome: BTreeMap<OutcomeId, Vec<&SurveyResponse>> = BTreeMap::new();
    for response in responses.iter().filter(|r| r.scale > 0.0) {
        by_outcome.entry(response.outcome_id).or_default().push(response);
    }

    by_outcome
        .into_iter()
        .map(|(outcome_id, group)| {
            let count = group.len();
            let average_score = group.iter().map(|r| r.score).sum::<f64>() / count as f64;
            let attainment_percentage =
                group.iter().map(|r| r.score * 100.0 / r.scale).sum::<f64>() / count as f64;
            IndirectAttainment {
                outcome_id,
                response_count: count,
                average_score,
                attainment_percentage,
            }
        })
        .collect()
}
