//! Shared mock threshold store for threshold handler tests.
//!
//! Mirrors the production contract: writes run the shared domain
//! overlap validator against the stored group before committing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DegreeId, OutcomeTier, ThresholdId};
use crate::domain::threshold::{find_conflicts, Threshold, ThresholdDraft};
use crate::ports::{ThresholdStore, ThresholdStoreError};

pub struct MockThresholdStore {
    thresholds: Mutex<Vec<Threshold>>,
    next_id: Mutex<i64>,
    fail_with_timeout: bool,
}

impl MockThresholdStore {
    pub fn empty() -> Self {
        Self {
            thresholds: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            fail_with_timeout: false,
        }
    }

    pub fn timing_out() -> Self {
        Self {
            thresholds: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            fail_with_timeout: true,
        }
    }

    pub fn with_group(drafts: Vec<ThresholdDraft>) -> Self {
        let thresholds: Vec<Threshold> = drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| Threshold::new(ThresholdId::new(i as i64 + 1), d))
            .collect();
        let next = thresholds.len() as i64 + 1;
        Self {
            thresholds: Mutex::new(thresholds),
            next_id: Mutex::new(next),
            fail_with_timeout: false,
        }
    }

    pub fn stored(&self) -> Vec<Threshold> {
        self.thresholds.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThresholdStore for MockThresholdStore {
    async fn load_group(
        &self,
        degree_id: DegreeId,
        tier: OutcomeTier,
    ) -> Result<Vec<Threshold>, ThresholdStoreError> {
        if self.fail_with_timeout {
            return Err(ThresholdStoreError::Timeout);
        }
        let mut group: Vec<Threshold> = self
            .thresholds
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.degree_id() == degree_id && t.tier() == tier)
            .cloned()
            .collect();
        group.sort_by(|a, b| {
            a.min()
                .value()
                .partial_cmp(&b.min().value())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(group)
    }

    async fn find_by_id(
        &self,
        id: ThresholdId,
    ) -> Result<Option<Threshold>, ThresholdStoreError> {
        if self.fail_with_timeout {
            return Err(ThresholdStoreError::Timeout);
        }
        Ok(self
            .thresholds
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn insert(&self, draft: &ThresholdDraft) -> Result<Threshold, ThresholdStoreError> {
        if self.fail_with_timeout {
            return Err(ThresholdStoreError::Timeout);
        }
        let mut thresholds = self.thresholds.lock().unwrap();
        let group: Vec<Threshold> = thresholds
            .iter()
            .filter(|t| t.degree_id() == draft.degree_id && t.tier() == draft.tier)
            .cloned()
            .collect();
        let conflicts = find_conflicts(draft.min.value(), draft.max.value(), &group, None);
        if !conflicts.is_empty() {
            return Err(ThresholdStoreError::Overlap { conflicts });
        }

        let mut next_id = self.next_id.lock().unwrap();
        let threshold = Threshold::new(ThresholdId::new(*next_id), draft.clone());
        *next_id += 1;
        thresholds.push(threshold.clone());
        Ok(threshold)
    }

    async fn update(
        &self,
        id: ThresholdId,
        draft: &ThresholdDraft,
    ) -> Result<Threshold, ThresholdStoreError> {
        if self.fail_with_timeout {
            return Err(ThresholdStoreError::Timeout);
        }
        let mut thresholds = self.thresholds.lock().unwrap();
        let group: Vec<Threshold> = thresholds
            .iter()
            .filter(|t| t.degree_id() == draft.degree_id && t.tier() == draft.tier)
            .cloned()
            .collect();
        let conflicts = find_conflicts(draft.min.value(), draft.max.value(), &group, Some(id));
        if !conflicts.is_empty() {
            return Err(ThresholdStoreError::Overlap { conflicts });
        }

        let existing = thresholds
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(ThresholdStoreError::NotFound(id))?;
        existing.apply(draft.clone());
        Ok(existing.clone())
    }

    async fn delete(&self, id: ThresholdId) -> Result<(), ThresholdStoreError> {
        if self.fail_with_timeout {
            return Err(ThresholdStoreError::Timeout);
        }
        let mut thresholds = self.thresholds.lock().unwrap();
        let before = thresholds.len();
        thresholds.retain(|t| t.id() != id);
        if thresholds.len() == before {
            return Err(ThresholdStoreError::NotFound(id));
        }
        Ok(())
    }
}

/// The standard three-level grading group for degree 1 / PLO.
pub fn standard_drafts() -> Vec<ThresholdDraft> {
    vec![
        ThresholdDraft::new(DegreeId::new(1), OutcomeTier::Plo, "Not Met", 0.0, 59.0, false)
            .unwrap(),
        ThresholdDraft::new(DegreeId::new(1), OutcomeTier::Plo, "Met", 60.0, 79.0, true).unwrap(),
        ThresholdDraft::new(
            DegreeId::new(1),
            OutcomeTier::Plo,
            "Exceeded",
            80.0,
            100.0,
            true,
        )
        .unwrap(),
    ]
}
