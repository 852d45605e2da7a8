//! CalculateIndirectHandler - attainment from survey responses.

use std::sync::Arc;

use tracing::debug;

use crate::domain::attainment::{aggregate_indirect, AttainmentResult, UNCLASSIFIED};
use crate::domain::foundation::{DegreeId, OutcomeTier, SurveyId};
use crate::domain::threshold::classify;
use crate::ports::{ScoreStore, ThresholdStore};

use super::AttainmentError;

/// Query for one survey's indirect attainment.
#[derive(Debug, Clone, Copy)]
pub struct CalculateIndirectQuery {
    pub survey_id: SurveyId,
    pub tier: OutcomeTier,
    pub degree_id: DegreeId,
}

/// Handler computing per-outcome indirect attainment for a survey.
pub struct CalculateIndirectHandler {
    score_store: Arc<dyn ScoreStore>,
    threshold_store: Arc<dyn ThresholdStore>,
}

impl CalculateIndirectHandler {
    pub fn new(score_store: Arc<dyn ScoreStore>, threshold_store: Arc<dyn ThresholdStore>) -> Self {
        Self {
            score_store,
            threshold_store,
        }
    }

    /// Groups the survey's responses by outcome, aggregates each group
    /// and classifies the percentages against the degree's thresholds.
    ///
    /// The threshold group is loaded once and reused across outcomes.
    pub async fn handle(
        &self,
        query: CalculateIndirectQuery,
    ) -> Result<Vec<AttainmentResult>, AttainmentError> {
        let responses = self
            .score_store
            .load_survey_responses(query.survey_id, query.tier)
            .await?;
        let aggregated = aggregate_indirect(&responses);

        debug!(
            survey = %query.survey_id,
            responses = responses.len(),
            outcomes = aggregated.len(),
            "indirect attainment aggregated"
        );

        let group = self
            .threshold_store
            .load_group(query.degree_id, query.tier)
            .await?;

        Ok(aggregated
            .into_iter()
            .map(|a| {
                let matched_level = classify(a.attainment_percentage, &group)
                    .map(|t| t.level_name().to_string())
                    .unwrap_or_else(|| UNCLASSIFIED.to_string());
                AttainmentResult {
                    outcome_id: a.outcome_id,
                    tier: query.tier,
                    source_id: query.survey_id.value(),
                    attainment_percentage: Some(a.attainment_percentage),
                    matched_level,
                    trend: None,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::attainment::tests_support::MockScoreStore;
    use crate::application::handlers::threshold::tests_support::{
        standard_drafts, MockThresholdStore,
    };
    use crate::domain::attainment::SurveyResponse;
    use crate::domain::foundation::OutcomeId;

    fn response(outcome: i64, score: f64) -> SurveyResponse {
        SurveyResponse {
            respondent_id: "r1".to_string(),
            outcome_id: OutcomeId::new(outcome),
            score,
            scale: 5.0,
        }
    }

    fn query() -> CalculateIndirectQuery {
        CalculateIndirectQuery {
            survey_id: SurveyId::new(3),
            tier: OutcomeTier::Plo,
            degree_id: DegreeId::new(1),
        }
    }

    #[tokio::test]
    async fn aggregates_per_outcome_and_classifies() {
        let scores = Arc::new(MockScoreStore::with_responses(
            SurveyId::new(3),
            vec![response(5, 4.0), response(5, 3.0), response(6, 5.0)],
        ));
        let thresholds = Arc::new(MockThresholdStore::with_group(standard_drafts()));
        let handler = CalculateIndirectHandler::new(scores, thresholds);

        let results = handler.handle(query()).await.unwrap();
        assert_eq!(results.len(), 2);

        // Outcome 5: mean(4, 3) / 5 -> 70% -> "Met".
        assert_eq!(results[0].outcome_id, OutcomeId::new(5));
        assert!((results[0].attainment_percentage.unwrap() - 70.0).abs() < 1e-9);
        assert_eq!(results[0].matched_level, "Met");

        // Outcome 6: 5 / 5 -> 100% -> "Exceeded".
        assert_eq!(results[1].outcome_id, OutcomeId::new(6));
        assert_eq!(results[1].matched_level, "Exceeded");
    }

    #[tokio::test]
    async fn survey_without_responses_yields_no_results() {
        let scores = Arc::new(MockScoreStore::with_responses(SurveyId::new(3), vec![]));
        let thresholds = Arc::new(MockThresholdStore::with_group(standard_drafts()));
        let handler = CalculateIndirectHandler::new(scores, thresholds);

        let results = handler.handle(query()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn unknown_survey_fails() {
        let scores = Arc::new(MockScoreStore::empty());
        let thresholds = Arc::new(MockThresholdStore::with_group(standard_drafts()));
        let handler = CalculateIndirectHandler::new(scores, thresholds);

        let result = handler.handle(query()).await;
        assert!(matches!(
            result,
            Err(AttainmentError::SurveyNotFound(id)) if id.value() == 3
        ));
    }

    #[tokio::test]
    async fn results_carry_the_survey_as_source() {
        let scores = Arc::new(MockScoreStore::with_responses(
            SurveyId::new(3),
            vec![response(5, 4.0)],
        ));
        let thresholds = Arc::new(MockThresholdStore::with_group(standard_drafts()));
        let handler = CalculateIndirectHandler::new(scores, thresholds);

        let results = handler.handle(query()).await.unwrap();
        assert_eq!(results[0].source_id, 3);
    }
}
