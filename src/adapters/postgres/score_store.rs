//! PostgreSQL implementation of ScoreStore.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::time::timeout;

use crate::domain::attainment::{DirectScore, SurveyResponse};
use crate::domain::foundation::{OutcomeId, OutcomeTier, SurveyId};
use crate::ports::{ScoreStore, ScoreStoreError};

/// PostgreSQL implementation of ScoreStore.
#[derive(Clone)]
pub struct PostgresScoreStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresScoreStore {
    /// Creates a store bound to a pool with a per-query deadline.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, ScoreStoreError>>,
    ) -> Result<T, ScoreStoreError> {
        timeout(self.query_timeout, fut)
            .await
            .map_err(|_| ScoreStoreError::Timeout)?
    }

    async fn fetch_scores(
        &self,
        outcome_id: OutcomeId,
    ) -> Result<Vec<DirectScore>, ScoreStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT student_id, raw_score, max_score
            FROM assessment_scores
            WHERE outcome_id = $1
            ORDER BY student_id
            "#,
        )
        .bind(outcome_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DirectScore {
                student_id: row.get("student_id"),
                raw_score: row.get("raw_score"),
                max_score: row.get("max_score"),
            })
            .collect())
    }

    async fn fetch_survey_responses(
        &self,
        survey_id: SurveyId,
        tier: OutcomeTier,
    ) -> Result<Vec<SurveyResponse>, ScoreStoreError> {
        let survey_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM surveys WHERE id = $1)")
                .bind(survey_id.value())
                .fetch_one(&self.pool)
                .await?;
        if !survey_exists.0 {
            return Err(ScoreStoreError::SurveyNotFound(survey_id));
        }

        let rows = sqlx::query(
            r#"
            SELECT respondent_id, outcome_id, score, scale
            FROM survey_responses
            WHERE survey_id = $1 AND outcome_tier = $2
            ORDER BY outcome_id, respondent_id
            "#,
        )
        .bind(survey_id.value())
        .bind(tier.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SurveyResponse {
                respondent_id: row.get("respondent_id"),
                outcome_id: OutcomeId::new(row.get("outcome_id")),
                score: row.get("score"),
                scale: row.get("scale"),
            })
            .collect())
    }
}

#[async_trait]
impl ScoreStore for PostgresScoreStore {
    async fn load_scores(
        &self,
        outcome_id: OutcomeId,
    ) -> Result<Vec<DirectScore>, ScoreStoreError> {
        // Idempotent read: one retry on transient failure.
        match self.bounded(self.fetch_scores(outcome_id)).await {
            Err(ScoreStoreError::Database(_)) => {
                self.bounded(self.fetch_scores(outcome_id)).await
            }
            other => other,
        }
    }

    async fn load_survey_responses(
        &self,
        survey_id: SurveyId,
        tier: OutcomeTier,
    ) -> Result<Vec<SurveyResponse>, ScoreStoreError> {
        match self
            .bounded(self.fetch_survey_responses(survey_id, tier))
            .await
        {
            Err(ScoreStoreError::Database(_)) => {
                self.bounded(self.fetch_survey_responses(survey_id, tier)).await
            }
            other => other,
        }
    }
}
