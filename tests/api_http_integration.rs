//! Integration tests for the HTTP API.
//!
//! These tests verify the HTTP layer wiring end to end against
//! in-memory store implementations:
//! 1. Request DTOs deserialize correctly
//! 2. Handlers compose with the application layer
//! 3. Error mapping produces the documented status codes

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use obe_hub::adapters::http::{api_router, ApiAppState};
use obe_hub::domain::attainment::{DirectScore, SurveyResponse};
use obe_hub::domain::foundation::{
    DegreeId, MatrixScope, OutcomeId, OutcomeTier, SurveyId, ThresholdId, TierPair,
};
use obe_hub::domain::outcome::{Mapping, Outcome};
use obe_hub::domain::threshold::{find_conflicts, Threshold, ThresholdDraft};
use obe_hub::ports::{
    OutcomeStore, OutcomeStoreError, ScoreStore, ScoreStoreError, ThresholdStore,
    ThresholdStoreError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory outcome store: degree 1 holds PEOs 1-2 and PLOs 10-12.
struct InMemoryOutcomeStore {
    edges: Mutex<HashSet<(TierPair, Mapping)>>,
}

impl InMemoryOutcomeStore {
    fn new() -> Self {
        Self {
            edges: Mutex::new(HashSet::new()),
        }
    }

    fn outcomes_of(tier: OutcomeTier) -> Vec<Outcome> {
        let ids: &[i64] = match tier {
            OutcomeTier::Peo => &[1, 2],
            OutcomeTier::Plo => &[10, 11, 12],
            OutcomeTier::Clo => &[20, 21],
        };
        ids.iter()
            .map(|id| {
                Outcome::new(
                    OutcomeId::new(*id),
                    tier,
                    format!("{}-{}", tier, id),
                    format!("Outcome {}", id),
                    None,
                )
            })
            .collect()
    }

    fn check_scope(scope: &MatrixScope) -> Result<(), OutcomeStoreError> {
        if scope.degree_id != DegreeId::new(1) {
            return Err(OutcomeStoreError::ScopeNotFound(scope.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for InMemoryOutcomeStore {
    async fn load_outcomes(
        &self,
        tier: OutcomeTier,
        scope: &MatrixScope,
    ) -> Result<Vec<Outcome>, OutcomeStoreError> {
        Self::check_scope(scope)?;
        Ok(Self::outcomes_of(tier))
    }

    async fn load_mappings(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
    ) -> Result<Vec<Mapping>, OutcomeStoreError> {
        Self::check_scope(scope)?;
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == pair)
            .map(|(_, m)| *m)
            .collect())
    }

    async fn toggle_mapping(
        &self,
        pair: TierPair,
        scope: &MatrixScope,
        mapping: &Mapping,
    ) -> Result<bool, OutcomeStoreError> {
        Self::check_scope(scope)?;

        if !Self::outcomes_of(pair.row_tier())
            .iter()
            .any(|o| o.id == mapping.source)
        {
            return Err(OutcomeStoreError::InvalidReference(mapping.source));
        }
        if !Self::outcomes_of(pair.column_tier())
            .iter()
            .any(|o| o.id == mapping.target)
        {
            return Err(OutcomeStoreError::InvalidReference(mapping.target));
        }

        let mut edges = self.edges.lock().unwrap();
        let key = (pair, *mapping);
        if edges.remove(&key) {
            Ok(false)
        } else {
            edges.insert(key);
            Ok(true)
        }
    }
}

/// In-memory threshold store running the shared overlap validator.
struct InMemoryThresholdStore {
    thresholds: Mutex<Vec<Threshold>>,
    next_id: Mutex<i64>,
}

impl InMemoryThresholdStore {
    fn new() -> Self {
        Self {
            thresholds: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    fn with_standard_group() -> Self {
        let store = Self::new();
        let drafts = [
            ("Not Met", 0.0, 59.0, false),
            ("Met", 60.0, 79.0, true),
            ("Exceeded", 80.0, 100.0, true),
        ];
        let mut thresholds = store.thresholds.lock().unwrap();
        let mut next_id = store.next_id.lock().unwrap();
        for (name, min, max, attained) in drafts {
            let draft =
                ThresholdDraft::new(DegreeId::new(1), OutcomeTier::Plo, name, min, max, attained)
                    .unwrap();
            thresholds.push(Threshold::new(ThresholdId::new(*next_id), draft));
            *next_id += 1;
        }
        drop(thresholds);
        drop(next_id);
        store
    }
}

#[async_trait]
impl ThresholdStore for InMemoryThresholdStore {
    async fn load_group(
        &self,
        degree_id: DegreeId,
        tier: OutcomeTier,
    ) -> Result<Vec<Threshold>, ThresholdStoreError> {
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
        Ok(self
            .thresholds
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn insert(&self, draft: &ThresholdDraft) -> Result<Threshold, ThresholdStoreError> {
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
        let mut thresholds = self.thresholds.lock().unwrap();
        let before = thresholds.len();
        thresholds.retain(|t| t.id() != id);
        if thresholds.len() == before {
            return Err(ThresholdStoreError::NotFound(id));
        }
        Ok(())
    }
}

/// In-memory score store.
struct InMemoryScoreStore {
    scores: HashMap<i64, Vec<DirectScore>>,
    responses: HashMap<i64, Vec<SurveyResponse>>,
}

impl InMemoryScoreStore {
    fn empty() -> Self {
        Self {
            scores: HashMap::new(),
            responses: HashMap::new(),
        }
    }

    fn with_survey(survey_id: i64, responses: Vec<SurveyResponse>) -> Self {
        let mut store = Self::empty();
        store.responses.insert(survey_id, responses);
        store
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn load_scores(
        &self,
        outcome_id: OutcomeId,
    ) -> Result<Vec<DirectScore>, ScoreStoreError> {
        Ok(self
            .scores
            .get(&outcome_id.value())
            .cloned()
            .unwrap_or_default())
    }

    async fn load_survey_responses(
        &self,
        survey_id: SurveyId,
        _tier: OutcomeTier,
    ) -> Result<Vec<SurveyResponse>, ScoreStoreError> {
        self.responses
            .get(&survey_id.value())
            .cloned()
            .ok_or(ScoreStoreError::SurveyNotFound(survey_id))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app(
    outcome_store: Arc<dyn OutcomeStore>,
    threshold_store: Arc<dyn ThresholdStore>,
    score_store: Arc<dyn ScoreStore>,
) -> axum::Router {
    api_router(ApiAppState {
        outcome_store,
        threshold_store,
        score_store,
    })
}

fn default_app() -> axum::Router {
    app(
        Arc::new(InMemoryOutcomeStore::new()),
        Arc::new(InMemoryThresholdStore::with_standard_group()),
        Arc::new(InMemoryScoreStore::empty()),
    )
}

fn request(method: &str, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header("x-user-id", "user-1").header("x-user-role", role);
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_endpoint_responds() {
    let response = default_app()
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unauthenticated_request_is_rejected() {
    let response = default_app()
        .oneshot(request(
            "GET",
            "/api/outcomes/plo?degree_id=1",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_cannot_toggle_mappings() {
    let body = json!({
        "pair": "peo-plo",
        "degree_id": 1,
        "row_id": 1,
        "column_id": 10
    });
    let response = default_app()
        .oneshot(request("POST", "/api/mappings/toggle", Some("staff"), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn toggle_flips_and_restores_the_edge() {
    let outcome_store = Arc::new(InMemoryOutcomeStore::new());
    let app = app(
        outcome_store,
        Arc::new(InMemoryThresholdStore::new()),
        Arc::new(InMemoryScoreStore::empty()),
    );

    let body = json!({
        "pair": "peo-plo",
        "degree_id": 1,
        "row_id": 1,
        "column_id": 10
    });

    let first = app
        .clone()
        .oneshot(request("POST", "/api/mappings/toggle", Some("admin"), Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await, json!({ "active": true }));

    // Coverage now reports one mapped column for PEO-1.
    let matrix = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/mappings/matrix?pair=peo-plo&degree_id=1",
            Some("staff"),
            None,
        ))
        .await
        .unwrap();
    let matrix = json_body(matrix).await;
    assert_eq!(matrix["row_coverage"][0]["mapped_count"], json!(1));

    let second = app
        .clone()
        .oneshot(request("POST", "/api/mappings/toggle", Some("admin"), Some(body)))
        .await
        .unwrap();
    assert_eq!(json_body(second).await, json!({ "active": false }));
}

#[tokio::test]
async fn toggle_of_unknown_outcome_is_unprocessable() {
    let body = json!({
        "pair": "peo-plo",
        "degree_id": 1,
        "row_id": 99,
        "column_id": 10
    });
    let response = default_app()
        .oneshot(request("POST", "/api/mappings/toggle", Some("admin"), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn thresholds_list_ascending_by_min() {
    let response = default_app()
        .oneshot(request(
            "GET",
            "/api/thresholds?degree_id=1&tier=plo",
            Some("staff"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["level_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Not Met", "Met", "Exceeded"]);
}

#[tokio::test]
async fn creating_overlapping_threshold_conflicts() {
    let body = json!({
        "degree_id": 1,
        "tier": "plo",
        "level_name": "Strong",
        "min_percentage": 70.0,
        "max_percentage": 90.0,
        "is_attained": true
    });
    let response = default_app()
        .oneshot(request("POST", "/api/thresholds", Some("admin"), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("THRESHOLD_OVERLAP"));
    let conflicts = body["details"]["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 2);
}

#[tokio::test]
async fn creating_valid_threshold_returns_created() {
    let app = app(
        Arc::new(InMemoryOutcomeStore::new()),
        Arc::new(InMemoryThresholdStore::new()),
        Arc::new(InMemoryScoreStore::empty()),
    );

    let body = json!({
        "degree_id": 1,
        "tier": "plo",
        "level_name": "Met",
        "min_percentage": 60.0,
        "max_percentage": 79.0,
        "is_attained": true
    });
    let response = app
        .oneshot(request("POST", "/api/thresholds", Some("admin"), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["level_name"], json!("Met"));
    assert_eq!(body["min_percentage"], json!(60.0));
}

#[tokio::test]
async fn invalid_threshold_fields_are_bad_request() {
    let body = json!({
        "degree_id": 1,
        "tier": "plo",
        "level_name": "",
        "min_percentage": 0.0,
        "max_percentage": 50.0,
        "is_attained": false
    });
    let response = default_app()
        .oneshot(request("POST", "/api/thresholds", Some("admin"), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_unknown_threshold_is_not_found() {
    let response = default_app()
        .oneshot(request("DELETE", "/api/thresholds/99", Some("admin"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn indirect_attainment_matches_survey_figures() {
    let responses = vec![
        SurveyResponse {
            respondent_id: "r1".to_string(),
            outcome_id: OutcomeId::new(5),
            score: 4.0,
            scale: 5.0,
        },
        SurveyResponse {
            respondent_id: "r2".to_string(),
            outcome_id: OutcomeId::new(5),
            score: 3.0,
            scale: 5.0,
        },
    ];
    let app = app(
        Arc::new(InMemoryOutcomeStore::new()),
        Arc::new(InMemoryThresholdStore::with_standard_group()),
        Arc::new(InMemoryScoreStore::with_survey(3, responses)),
    );

    let body = json!({ "survey_id": 3, "tier": "plo", "degree_id": 1 });
    let response = app
        .oneshot(request(
            "POST",
            "/api/attainment/indirect/calculate",
            Some("staff"),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let results = json_body(response).await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["attainment_percentage"], json!(70.0));
    assert_eq!(results[0]["matched_level"], json!("Met"));
}

#[tokio::test]
async fn direct_attainment_without_scores_is_null() {
    let body = json!({ "outcome_id": 5, "tier": "plo", "degree_id": 1 });
    let response = default_app()
        .oneshot(request(
            "POST",
            "/api/attainment/direct/calculate",
            Some("staff"),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result = json_body(response).await;
    assert_eq!(result["attainment_percentage"], Value::Null);
    assert_eq!(result["matched_level"], json!("Unclassified"));
}

#[tokio::test]
async fn coverage_validation_reports_complete_group() {
    let response = default_app()
        .oneshot(request(
            "GET",
            "/api/attainment/coverage/validate?degree_id=1&tier=plo",
            Some("staff"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = json_body(response).await;
    assert_eq!(report["is_complete"], json!(true));
    assert_eq!(report["gaps"], json!([]));
}

#[tokio::test]
async fn unknown_scope_is_not_found() {
    let response = default_app()
        .oneshot(request(
            "GET",
            "/api/outcomes/plo?degree_id=999",
            Some("staff"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
