//! CalculateDirectHandler - attainment from graded assessment scores.

use std::sync::Arc;

use tracing::debug;

use crate::domain::attainment::{aggregate_direct, AttainmentResult, Trend, UNCLASSIFIED};
use crate::domain::foundation::{DegreeId, OutcomeId, OutcomeTier};
use crate::domain::threshold::classify;
use crate::ports::{ScoreStore, ThresholdStore};

use super::AttainmentError;

/// Query for one outcome's direct attainment.
#[derive(Debug, Clone)]
pub struct CalculateDirectQuery {
    pub outcome_id: OutcomeId,
    pub tier: OutcomeTier,
    pub degree_id: DegreeId,
    /// Prior period's attainment for the same outcome, for trend
    /// enrichment.
    pub previous_percentage: Option<f64>,
}

/// Handler computing direct attainment for one outcome.
pub struct CalculateDirectHandler {
    score_store: Arc<dyn ScoreStore>,
    threshold_store: Arc<dyn ThresholdStore>,
}

impl CalculateDirectHandler {
    pub fn new(score_store: Arc<dyn ScoreStore>, threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self {
            score_store,
            threshold_store,
        }
    }

    /// Aggregates the outcome's graded scores and classifies the result.
    ///
    /// An outcome with zero measurements reports a `None` percentage -
    /// "no data yet" is an expected state, not a fault.
    pub async fn handle(
        &self,
        query: CalculateDirectQuery,
    ) -> Result<AttainmentResult, AttainmentError> {
        let scores = self.score_store.load_scores(query.outcome_id).await?;
        let percentage = aggregate_direct(&scores);

        debug!(
            outcome = %query.outcome_id,
            records = scores.len(),
            percentage = ?percentage,
            "direct attainment aggregated"
        );

        let matched_level = match percentage {
            Some(score) => {
                let group = self
                    .threshold_store
                    .load_group(query.degree_id, query.tier)
                    .await?;
                classify(score, &group)
                    .map(|t| t.level_name().to_string())
                    .unwrap_or_else(|| UNCLASSIFIED.to_string())
            }
            None => UNCLASSIFIED.to_string(),
        };

        let trend = match (percentage, query.previous_percentage) {
            (Some(current), Some(previous)) => Some(Trend::compute(current, previous)),
            _ => None,
        };

        Ok(AttainmentResult {
            outcome_id: query.outcome_id,
            tier: query.tier,
            source_id: query.outcome_id.value(),
            attainment_percentage: percentage,
            matched_level,
            trend,
        })
    }
}
