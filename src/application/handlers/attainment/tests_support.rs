//! Shared mock score store for attainment handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::attainment::{DirectScore, SurveyResponse};
use crate::domain::foundation::{OutcomeId, OutcomeTier, SurveyId};
use crate::ports::{ScoreStore, ScoreStoreError};

pub struct MockScoreStore {
    scores: Mutex<HashMap<OutcomeId, Vec<DirectScore>>>,
    responses: Mutex<HashMap<SurveyId, Vec<SurveyResponse>>>,
}

impl MockScoreStore {
    pub fn empty() -> Self {
        Self {
            scores: Mutex::new(HashMap::new()),
            responses: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_scores(outcome_id: OutcomeId, scores: Vec<DirectScore>) -> Self {
        let store = Self::empty();
        store.scores.lock().unwrap().insert(outcome_id, scores);
        store
    }

    pub fn with_responses(survey_id: SurveyId, responses: Vec<SurveyResponse>) -> Self {
        let store = Self::empty();
        store.responses.lock().unwrap().insert(survey_id, responses);
        store
    }
}

#[async_trait]
impl ScoreStore for MockScoreStore {
    async fn load_scores(
        &self,
        outcome_id: OutcomeId,
    ) -> Result<Vec<DirectScore>, ScoreStoreError> {
        Ok(self
            .scores
            .lock()
            .unwrap()
            .get(&outcome_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_survey_responses(
        &self,
        survey_id: SurveyId,
        _tier: OutcomeTier,
    ) -> Result<Vec<SurveyResponse>, ScoreStoreError> {
        self.responses
            .lock()
            .unwrap()
            .get(&survey_id)
            .cloned()
            .ok_or(ScoreStoreError::SurveyNotFound(survey_id))
    }
}
