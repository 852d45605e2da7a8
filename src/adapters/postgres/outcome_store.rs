//! PostgreSQL implementation of OutcomeStore.
//!
//! Outcomes live in SIS-owned tables; mapping edges live in
//! `outcome_mappings` keyed by (pair, degree, source, target) so the
//! toggle is a delete-or-insert inside one transaction.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::time::timeout;

use crate::domain::foundation::{MatrixScope, OutcomeId, OutcomeTier, TierPair};
use crate::domain::outcome::{Mapping, Outcome};
use crate::ports::{OutcomeStore, OutcomeStoreError};

/// PostgreSQL implementation of OutcomeStore.
#[derive(Clone)]
pub struct PostgresOutcomeStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresOutcomeStore {
    /// Creates a store bound to a pool with a per-query deadline.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, OutcomeStoreError>>,
    ) -> Result<T, OutcomeStoreError> {
        timeout(self.query_timeout, fut)
            .await
            .map_err(|_| OutcomeStoreError::Timeout)?
    }

    async fn check_scope(&self, scope: &MatrixScope) -> Result<(), OutcomeStoreError> {
        let degree_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM degrees WHERE id = $1)")
                .bind(scope.degree_id.value())
                .fetch_one(&self.pool)
                .await?;
        if !degree_exists.0 {
            return Err(OutcomeStoreError::ScopeNotFound(scope.to_string()));
        }

        if let Some(course_id) = scope.course_id {
            let course_exists: (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM course_offerings WHERE id = $1 AND degree_id = $2)",
            )
            .bind(course_id.value())
            .bind(scope.degree_id.value())
            .fetch_one(&self.pool)
            .await?;
            if !course_exists.0 {
                return Err(OutcomeStoreError::ScopeNotFound(scope.to_string()));
            }
        }

        Ok(())
    }

    async fn fetch_outcomes(
        &self,
        tier: OutcomeTier,
        scope: &MatrixScope,
    ) -> Result<Vec<Outcome>, OutcomeStoreError> {
        self.check_scope(scope).await?;

        let rows = match tier {
            OutcomeTier::Clo => {
                // check_scope guarantees course_id is present when the
                // caller follows MatrixScope::check_tier; a missing one
                // simply selects nothing.
                let course_id = scope.course_id.map(|c| c.value()).unwrap_or(-1);
                sqlx::query(
                    r#"
                    SELECT id, code, description, ordinal
                    FROM outcomes
                    WHERE tier = $1 AND course_offering_id = $2
                    ORDER BY ordinal NULLS LAST, code
                    "#,
                )
                .bind(tier.as_str())
                .bind(course_id)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query(
                    r#"
                    SELECT id, code, description, ordinal
                    FROM outcomes
                    WHERE tier = $1 AND degree_id = $2
                    ORDER BY ordinal NULLS LAST, code
                    "#,
                )
                .bind(tier.as_str())
                .bind(scope.degree_id.value())
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                Outcome::new(
                    OutcomeId::new(row.get("id")),
                    tier,
                    row.get::<String, _>("code"),
                    row.get::<String, _>("description"),
                    row.get("ordinal"),
                )
            })
            .collect())
    }

    async fn fetch_mappings(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
    ) -> Result<Vec<Mapping>, OutcomeStoreError> {
        self.check_scope(scope).await?;

        let rows = match pair {
            TierPair::PeoPlo => {
                sqlx::query(
                    r#"
                    SELECT source_id, target_id
                    FROM outcome_mappings
                    WHERE pair = $1 AND degree_id = $2
                    ORDER BY source_id, target_id
                    "#,
                )
                .bind(pair.as_str())
                .bind(scope.degree_id.value())
                .fetch_all(&self.pool)
                .await?
            }
            TierPair::PloClo => {
                let course_id = scope.course_id.map(|c| c.value()).unwrap_or(-1);
                sqlx::query(
                    r#"
                    SELECT m.source_id, m.target_id
                    FROM outcome_mappings m
                    JOIN outcomes c
                      ON c.tier = 'clo' AND c.id = m.target_id
                    WHERE m.pair = $1 AND m.degree_id = $2
                      AND c.course_offering_id = $3
                    ORDER BY m.source_id, m.target_id
                    "#,
                )
                .bind(pair.as_str())
                .bind(scope.degree_id.value())
                .bind(course_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                Mapping::new(
                    OutcomeId::new(row.get("source_id")),
                    OutcomeId::new(row.get("target_id")),
                )
            })
            .collect())
    }

    /// Verifies an outcome belongs to the tier and scope, inside the
    /// toggle transaction.
    async fn check_outcome_in_scope(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tier: OutcomeTier,
        scope: &MatrixScope,
        id: OutcomeId,
    ) -> Result<(), OutcomeStoreError> {
        let exists: (bool,) = match tier {
            OutcomeTier::Clo => {
                let course_id = scope.course_id.map(|c| c.value()).unwrap_or(-1);
                sqlx::query_as(
                    r#"
                    SELECT EXISTS (
                        SELECT 1 FROM outcomes
                        WHERE tier = $1 AND id = $2 AND course_offering_id = $3
                    )
                    "#,
                )
                .bind(tier.as_str())
                .bind(id.value())
                .bind(course_id)
                .fetch_one(&mut **tx)
                .await?
            }
            _ => {
                sqlx::query_as(
                    r#"
                    SELECT EXISTS (
                        SELECT 1 FROM outcomes
                        WHERE tier = $1 AND id = $2 AND degree_id = $3
                    )
                    "#,
                )
                .bind(tier.as_str())
                .bind(id.value())
                .bind(scope.degree_id.value())
                .fetch_one(&mut **tx)
                .await?
            }
        };

        if !exists.0 {
            return Err(OutcomeStoreError::InvalidReference(id));
        }
        Ok(())
    }

    async fn flip_mapping(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
        mapping: &Mapping,
    ) -> Result<bool, OutcomeStoreError> {
        self.check_scope(scope).await?;

        let mut tx = self.pool.begin().await?;

        Self::check_outcome_in_scope(&mut tx, pair.row_tier(), scope, mapping.source).await?;
        Self::check_outcome_in_scope(&mut tx, pair.column_tier(), scope, mapping.target).await?;

        // Delete-or-insert: the primary key serializes concurrent
        // toggles of the same pair, so no update is ever lost.
        let deleted = sqlx::query(
            r#"
            DELETE FROM outcome_mappings
            WHERE pair = $1 AND degree_id = $2 AND source_id = $3 AND target_id = $4
            "#,
        )
        .bind(pair.as_str())
        .bind(scope.degree_id.value())
        .bind(mapping.source.value())
        .bind(mapping.target.value())
        .execute(&mut *tx)
        .await?;

        let active = if deleted.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO outcome_mappings (pair, degree_id, source_id, target_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(pair.as_str())
            .bind(scope.degree_id.value())
            .bind(mapping.source.value())
            .bind(mapping.target.value())
            .execute(&mut *tx)
            .await?;
            true
        } else {
            false
        };

        tx.commit().await?;
        Ok(active)
    }
}

#[async_trait]
impl OutcomeStore for PostgresOutcomeStore {
    async fn load_outcomes(
        &self,
        tier: OutcomeTier,
        scope: &MatrixScope,
    ) -> Result<Vec<Outcome>, OutcomeStoreError> {
        // Idempotent read: one retry on transient failure.
        match self.bounded(self.fetch_outcomes(tier, scope)).await {
            Err(OutcomeStoreError::Database(_)) => {
                self.bounded(self.fetch_outcomes(tier, scope)).await
            }
            other => other,
        }
    }

    async fn load_mappings(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
    ) -> Result<Vec<Mapping>, OutcomeStoreError> {
        match self.bounded(self.fetch_mappings(pair, scope)).await {
            Err(OutcomeStoreError::Database(_)) => {
                self.bounded(self.fetch_mappings(pair, scope)).await
            }
            other => other,
        }
    }

    async fn toggle_mapping(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
        mapping: &Mapping,
    ) -> Result<bool, OutcomeStoreError> {
        // Mutations are never retried: a second attempt after a lost
        // reply could flip the edge twice.
        self.bounded(self.flip_mapping(pair, scope, mapping)).await
    }
}
