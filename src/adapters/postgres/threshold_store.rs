//! PostgreSQL implementation of ThresholdStore.
//!
//! Writes lock the (degree, tier) group with `SELECT ... FOR UPDATE`
//! and re-run the shared domain overlap validator on the locked rows,
//! so the pre-check and the write are atomic with respect to other
//! writers on the same group.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tokio::time::timeout;

use crate::domain::foundation::{DegreeId, OutcomeTier, Percent, ThresholdId, Timestamp};
use crate::domain::threshold::{find_conflicts, Threshold, ThresholdDraft};
use crate::ports::{ThresholdStore, ThresholdStoreError};

/// PostgreSQL implementation of ThresholdStore.
#[derive(Clone)]
pub struct PostgresThresholdStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresThresholdStore {
    /// Creates a store bound to a pool with a per-query deadline.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, ThresholdStoreError>>,
    ) -> Result<T, ThresholdStoreError> {
        timeout(self.query_timeout, fut)
            .await
            .map_err(|_| ThresholdStoreError::Timeout)?
    }

    async fn fetch_group(
        &self,
        degree_id: DegreeId,
        tier: OutcomeTier,
    ) -> Result<Vec<Threshold>, ThresholdStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, degree_id, tier, level_name, min_percentage, max_percentage,
                   is_attained, created_at, updated_at
            FROM thresholds
            WHERE degree_id = $1 AND tier = $2
            ORDER BY min_percentage ASC
            "#,
        )
        .bind(degree_id.value())
        .bind(tier.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_threshold).collect()
    }

    /// Locks the group rows and returns them; must run inside `tx`.
    async fn lock_group(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        degree_id: DegreeId,
        tier: OutcomeTier,
    ) -> Result<Vec<Threshold>, ThresholdStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, degree_id, tier, level_name, min_percentage, max_percentage,
                   is_attained, created_at, updated_at
            FROM thresholds
            WHERE degree_id = $1 AND tier = $2
            ORDER BY min_percentage ASC
            FOR UPDATE
            "#,
        )
        .bind(degree_id.value())
        .bind(tier.as_str())
        .fetch_all(&mut **tx)
        .await?;

        rows.into_iter().map(row_to_threshold).collect()
    }

    async fn insert_guarded(
        &self,
        draft: &ThresholdDraft,
    ) -> Result<Threshold, ThresholdStoreError> {
        let mut tx = self.pool.begin().await?;

        let group = Self::lock_group(&mut tx, draft.degree_id, draft.tier).await?;
        let conflicts = find_conflicts(draft.min.value(), draft.max.value(), &group, None);
        if !conflicts.is_empty() {
            return Err(ThresholdStoreError::Overlap { conflicts });
        }

        let row = sqlx::query(
            r#"
            INSERT INTO thresholds (
                degree_id, tier, level_name, min_percentage, max_percentage, is_attained
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, degree_id, tier, level_name, min_percentage, max_percentage,
                      is_attained, created_at, updated_at
            "#,
        )
        .bind(draft.degree_id.value())
        .bind(draft.tier.as_str())
        .bind(&draft.level_name)
        .bind(draft.min.value())
        .bind(draft.max.value())
        .bind(draft.is_attained)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row_to_threshold(row)
    }

    async fn update_guarded(
        &self,
        id: ThresholdId,
        draft: &ThresholdDraft,
    ) -> Result<Threshold, ThresholdStoreError> {
        let mut tx = self.pool.begin().await?;

        let group = Self::lock_group(&mut tx, draft.degree_id, draft.tier).await?;
        let conflicts = find_conflicts(draft.min.value(), draft.max.value(), &group, Some(id));
        if !conflicts.is_empty() {
            return Err(ThresholdStoreError::Overlap { conflicts });
        }

        let row = sqlx::query(
            r#"
            UPDATE thresholds SET
                degree_id = $2,
                tier = $3,
                level_name = $4,
                min_percentage = $5,
                max_percentage = $6,
                is_attained = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING id, degree_id, tier, level_name, min_percentage, max_percentage,
                      is_attained, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(draft.degree_id.value())
        .bind(draft.tier.as_str())
        .bind(&draft.level_name)
        .bind(draft.min.value())
        .bind(draft.max.value())
        .bind(draft.is_attained)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ThresholdStoreError::NotFound(id))?;

        tx.commit().await?;
        row_to_threshold(row)
    }

    async fn delete_row(&self, id: ThresholdId) -> Result<(), ThresholdStoreError> {
        let result = sqlx::query("DELETE FROM thresholds WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ThresholdStoreError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ThresholdStore for PostgresThresholdStore {
    async fn load_group(
        &self,
        degree_id: DegreeId,
        tier: OutcomeTier,
    ) -> Result<Vec<Threshold>, ThresholdStoreError> {
        // Idempotent read: one retry on transient failure.
        match self.bounded(self.fetch_group(degree_id, tier)).await {
            Err(ThresholdStoreError::Database(_)) => {
                self.bounded(self.fetch_group(degree_id, tier)).await
            }
            other => other,
        }
    }

    async fn find_by_id(
        &self,
        id: ThresholdId,
    ) -> Result<Option<Threshold>, ThresholdStoreError> {
        let fetch = async {
            let row = sqlx::query(
                r#"
                SELECT id, degree_id, tier, level_name, min_percentage, max_percentage,
                       is_attained, created_at, updated_at
                FROM thresholds
                WHERE id = $1
                "#,
            )
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;
            row.map(row_to_threshold).transpose()
        };
        self.bounded(fetch).await
    }

    async fn insert(&self, draft: &ThresholdDraft) -> Result<Threshold, ThresholdStoreError> {
        self.bounded(self.insert_guarded(draft)).await
    }

    async fn update(
        &self,
        id: ThresholdId,
        draft: &ThresholdDraft,
    ) -> Result<Threshold, ThresholdStoreError> {
        self.bounded(self.update_guarded(id, draft)).await
    }

    async fn delete(&self, id: ThresholdId) -> Result<(), ThresholdStoreError> {
        self.bounded(self.delete_row(id)).await
    }
}

fn row_to_threshold(row: PgRow) -> Result<Threshold, ThresholdStoreError> {
    let tier_str: String = row.get("tier");
    let tier = OutcomeTier::parse(&tier_str)
        .map_err(|e| ThresholdStoreError::Database(e.to_string()))?;
    let min = Percent::try_new(row.get("min_percentage"))
        .map_err(|e| ThresholdStoreError::Database(e.to_string()))?;
    let max = Percent::try_new(row.get("max_percentage"))
        .map_err(|e| ThresholdStoreError::Database(e.to_string()))?;

    Ok(Threshold::reconstitute(
        ThresholdId::new(row.get("id")),
        DegreeId::new(row.get("degree_id")),
        tier,
        row.get("level_name"),
        min,
        max,
        row.get("is_attained"),
        Timestamp::from_datetime(row.get("created_at")),
        Timestamp::from_datetime(row.get("updated_at")),
    ))
}
