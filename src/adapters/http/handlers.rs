//! HTTP handlers for the OBE Hub API.
//!
//! These handlers connect Axum routes to the application layer. The
//! upstream gateway authenticates callers and injects `x-user-id` and
//! `x-user-role` headers; reads require any authenticated user and
//! mutations require the `admin` role.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    AttainmentError, CalculateDirectHandler, CalculateDirectQuery, CalculateIndirectHandler,
    CalculateIndirectQuery, CoverageSummaryHandler, CoverageSummaryQuery, CreateThresholdCommand,
    CreateThresholdHandler, DeleteThresholdCommand, DeleteThresholdHandler, GetMatrixHandler,
    GetMatrixQuery, ListOutcomesHandler, ListOutcomesQuery, ListThresholdsHandler,
    ListThresholdsQuery, MappingError, OutcomeQueryError, ThresholdCommandError,
    ToggleMappingCommand, ToggleMappingHandler, UpdateThresholdCommand, UpdateThresholdHandler,
    ValidateCoverageHandler, ValidateCoverageQuery,
};
use crate::domain::foundation::{
    CommandMetadata, CourseOfferingId, DegreeId, MatrixScope, OutcomeId, OutcomeTier, SurveyId,
    ThresholdId, TierPair, UserId,
};
use crate::ports::{OutcomeStore, ScoreStore, ThresholdStore};

use super::dto::{
    AttainmentResult, CalculateDirectRequest, CalculateIndirectRequest, CoverageReport,
    CoverageSummary, CreateThresholdRequest, ErrorResponse, ListOutcomesParams, MatrixParams,
    MatrixView, Outcome, ThresholdGroupParams, ThresholdView, ToggleMappingRequest,
    ToggleMappingResponse, UpdateThresholdRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// API error that implements IntoResponse.
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InvalidReference(String),
    Overlap { conflicts: Vec<ThresholdView> },
    Unauthorized,
    Forbidden(String),
    Timeout,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
            ApiError::InvalidReference(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::invalid_reference(msg),
            ),
            ApiError::Overlap { conflicts } => (
                StatusCode::CONFLICT,
                ErrorResponse::overlap("Range overlaps existing thresholds", conflicts),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::unauthorized("Authentication is required"),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::forbidden(msg)),
            ApiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, ErrorResponse::timeout()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<MappingError> for ApiError {
    fn from(error: MappingError) -> Self {
        match error {
            MappingError::ScopeNotFound(scope) => {
                ApiError::NotFound(format!("Scope not found: {}", scope))
            }
            MappingError::InvalidReference(id) => ApiError::InvalidReference(format!(
                "Outcome {} does not exist in the requested scope",
                id
            )),
            MappingError::Domain(err) => ApiError::BadRequest(err.to_string()),
            MappingError::Timeout => ApiError::Timeout,
            MappingError::Database(msg) => ApiError::Internal(format!("Database error: {}", msg)),
        }
    }
}

impl From<ThresholdCommandError> for ApiError {
    fn from(error: ThresholdCommandError) -> Self {
        match error {
            ThresholdCommandError::Validation(err) => ApiError::BadRequest(err.to_string()),
            ThresholdCommandError::NotFound(id) => {
                ApiError::NotFound(format!("Threshold not found: {}", id))
            }
            ThresholdCommandError::Overlap { conflicts } => ApiError::Overlap {
                conflicts: conflicts.iter().map(ThresholdView::from).collect(),
            },
            ThresholdCommandError::Timeout => ApiError::Timeout,
            ThresholdCommandError::Database(msg) => {
                ApiError::Internal(format!("Database error: {}", msg))
            }
        }
    }
}

impl From<AttainmentError> for ApiError {
    fn from(error: AttainmentError) -> Self {
        match error {
            AttainmentError::SurveyNotFound(id) => {
                ApiError::NotFound(format!("Survey not found: {}", id))
            }
            AttainmentError::Timeout => ApiError::Timeout,
            AttainmentError::Database(msg) => {
                ApiError::Internal(format!("Database error: {}", msg))
            }
        }
    }
}

impl From<OutcomeQueryError> for ApiError {
    fn from(error: OutcomeQueryError) -> Self {
        match error {
            OutcomeQueryError::ScopeNotFound(scope) => {
                ApiError::NotFound(format!("Scope not found: {}", scope))
            }
            OutcomeQueryError::Domain(err) => ApiError::BadRequest(err.to_string()),
            OutcomeQueryError::Timeout => ApiError::Timeout,
            OutcomeQueryError::Database(msg) => {
                ApiError::Internal(format!("Database error: {}", msg))
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing the store ports.
#[derive(Clone)]
pub struct ApiAppState {
    pub outcome_store: Arc<dyn OutcomeStore>,
    pub threshold_store: Arc<dyn ThresholdStore>,
    pub score_store: Arc<dyn ScoreStore>,
}

impl ApiAppState {
    pub fn list_outcomes_handler(&self) -> ListOutcomesHandler {
        ListOutcomesHandler::new(self.outcome_store.clone())
    }

    pub fn toggle_mapping_handler(&self) -> ToggleMappingHandler {
        ToggleMappingHandler::new(self.outcome_store.clone())
    }

    pub fn get_matrix_handler(&self) -> GetMatrixHandler {
        GetMatrixHandler::new(self.outcome_store.clone())
    }

    pub fn coverage_summary_handler(&self) -> CoverageSummaryHandler {
        CoverageSummaryHandler::new(self.outcome_store.clone())
    }

    pub fn create_threshold_handler(&self) -> CreateThresholdHandler {
        CreateThresholdHandler::new(self.threshold_store.clone())
    }

    pub fn update_threshold_handler(&self) -> UpdateThresholdHandler {
        UpdateThresholdHandler::new(self.threshold_store.clone())
    }

    pub fn delete_threshold_handler(&self) -> DeleteThresholdHandler {
        DeleteThresholdHandler::new(self.threshold_store.clone())
    }

    pub fn list_thresholds_handler(&self) -> ListThresholdsHandler {
        ListThresholdsHandler::new(self.threshold_store.clone())
    }

    pub fn calculate_direct_handler(&self) -> CalculateDirectHandler {
        CalculateDirectHandler::new(self.score_store.clone(), self.threshold_store.clone())
    }

    pub fn calculate_indirect_handler(&self) -> CalculateIndirectHandler {
        CalculateIndirectHandler::new(self.score_store.clone(), self.threshold_store.clone())
    }

    pub fn validate_coverage_handler(&self) -> ValidateCoverageHandler {
        ValidateCoverageHandler::new(self.threshold_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Caller role as asserted by the upstream gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

/// Authenticated user context extracted from gateway headers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Mutating endpoints require the admin role.
    fn require_admin(&self) -> Result<(), ApiError> {
        if self.role != Role::Admin {
            return Err(ApiError::Forbidden(
                "This operation requires the admin role".to_string(),
            ));
        }
        Ok(())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::new(self.user_id.clone())
    }
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::unauthorized("Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("x-user-id")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            let role = parts
                .headers
                .get("x-user-role")
                .and_then(|h| h.to_str().ok())
                .and_then(Role::parse)
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id, role })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Parsing helpers
// ════════════════════════════════════════════════════════════════════════════════

fn parse_tier(s: &str) -> Result<OutcomeTier, ApiError> {
    OutcomeTier::parse(s).map_err(|_| ApiError::BadRequest(format!("Invalid tier: {}", s)))
}

fn parse_pair(s: &str) -> Result<TierPair, ApiError> {
    TierPair::parse(s).map_err(|_| ApiError::BadRequest(format!("Invalid tier pair: {}", s)))
}

fn scope_of(degree_id: i64, course_id: Option<i64>) -> MatrixScope {
    match course_id {
        Some(course) => MatrixScope::course(DegreeId::new(degree_id), CourseOfferingId::new(course)),
        None => MatrixScope::degree(DegreeId::new(degree_id)),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/outcomes/:tier?degree_id=&course_id=&search=
pub async fn list_outcomes(
    State(state): State<ApiAppState>,
    Path(tier_str): Path<String>,
    Query(params): Query<ListOutcomesParams>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Outcome>>, ApiError> {
    let tier = parse_tier(&tier_str)?;

    let query = ListOutcomesQuery {
        tier,
        scope: scope_of(params.degree_id, params.course_id),
        search: params.search,
    };

    let outcomes = state.list_outcomes_handler().handle(query).await?;
    Ok(Json(outcomes))
}

/// POST /api/mappings/toggle
pub async fn toggle_mapping(
    State(state): State<ApiAppState>,
    user: AuthenticatedUser,
    Json(body): Json<ToggleMappingRequest>,
) -> Result<Json<ToggleMappingResponse>, ApiError> {
    user.require_admin()?;
    let pair = parse_pair(&body.pair)?;

    let cmd = ToggleMappingCommand {
        pair,
        scope: scope_of(body.degree_id, body.course_id),
        row_id: OutcomeId::new(body.row_id),
        column_id: OutcomeId::new(body.column_id),
    };

    let result = state
        .toggle_mapping_handler()
        .handle(cmd, user.metadata())
        .await?;
    Ok(Json(ToggleMappingResponse {
        active: result.active,
    }))
}

/// GET /api/mappings/matrix?pair=&degree_id=&course_id=
pub async fn get_matrix(
    State(state): State<ApiAppState>,
    Query(params): Query<MatrixParams>,
    _user: AuthenticatedUser,
) -> Result<Json<MatrixView>, ApiError> {
    let pair = parse_pair(&params.pair)?;

    let query = GetMatrixQuery {
        pair,
        scope: scope_of(params.degree_id, params.course_id),
    };

    let view = state.get_matrix_handler().handle(query).await?;
    Ok(Json(view))
}

/// GET /api/mappings/coverage?pair=&degree_id=&course_id=
pub async fn mapping_coverage(
    State(state): State<ApiAppState>,
    Query(params): Query<MatrixParams>,
    _user: AuthenticatedUser,
) -> Result<Json<CoverageSummary>, ApiError> {
    let pair = parse_pair(&params.pair)?;

    let query = CoverageSummaryQuery {
        pair,
        scope: scope_of(params.degree_id, params.course_id),
    };

    let summary = state.coverage_summary_handler().handle(query).await?;
    Ok(Json(summary))
}

/// GET /api/thresholds?degree_id=&tier=
pub async fn list_thresholds(
    State(state): State<ApiAppState>,
    Query(params): Query<ThresholdGroupParams>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<ThresholdView>>, ApiError> {
    let tier = parse_tier(&params.tier)?;

    let group = state
        .list_thresholds_handler()
        .handle(ListThresholdsQuery {
            degree_id: DegreeId::new(params.degree_id),
            tier,
        })
        .await?;

    Ok(Json(group.iter().map(ThresholdView::from).collect()))
}

/// POST /api/thresholds
pub async fn create_threshold(
    State(state): State<ApiAppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateThresholdRequest>,
) -> Result<(StatusCode, Json<ThresholdView>), ApiError> {
    user.require_admin()?;
    let tier = parse_tier(&body.tier)?;

    let cmd = CreateThresholdCommand {
        degree_id: DegreeId::new(body.degree_id),
        tier,
        level_name: body.level_name,
        min_percentage: body.min_percentage,
        max_percentage: body.max_percentage,
        is_attained: body.is_attained,
    };

    let threshold = state
        .create_threshold_handler()
        .handle(cmd, user.metadata())
        .await?;
    Ok((StatusCode::CREATED, Json(ThresholdView::from(&threshold))))
}

/// PUT /api/thresholds/:id
pub async fn update_threshold(
    State(state): State<ApiAppState>,
    Path(id): Path<i64>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateThresholdRequest>,
) -> Result<Json<ThresholdView>, ApiError> {
    user.require_admin()?;
    let tier = parse_tier(&body.tier)?;

    let cmd = UpdateThresholdCommand {
        id: ThresholdId::new(id),
        degree_id: DegreeId::new(body.degree_id),
        tier,
        level_name: body.level_name,
        min_percentage: body.min_percentage,
        max_percentage: body.max_percentage,
        is_attained: body.is_attained,
    };

    let threshold = state
        .update_threshold_handler()
        .handle(cmd, user.metadata())
        .await?;
    Ok(Json(ThresholdView::from(&threshold)))
}

/// DELETE /api/thresholds/:id
pub async fn delete_threshold(
    State(state): State<ApiAppState>,
    Path(id): Path<i64>,
    user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    user.require_admin()?;

    state
        .delete_threshold_handler()
        .handle(
            DeleteThresholdCommand {
                id: ThresholdId::new(id),
            },
            user.metadata(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/attainment/direct/calculate
pub async fn calculate_direct(
    State(state): State<ApiAppState>,
    _user: AuthenticatedUser,
    Json(body): Json<CalculateDirectRequest>,
) -> Result<Json<AttainmentResult>, ApiError> {
    let tier = parse_tier(&body.tier)?;

    let query = CalculateDirectQuery {
        outcome_id: OutcomeId::new(body.outcome_id),
        tier,
        degree_id: DegreeId::new(body.degree_id),
        previous_percentage: body.previous_percentage,
    };

    let result = state.calculate_direct_handler().handle(query).await?;
    Ok(Json(result))
}

/// POST /api/attainment/indirect/calculate
pub async fn calculate_indirect(
    State(state): State<ApiAppState>,
    _user: AuthenticatedUser,
    Json(body): Json<CalculateIndirectRequest>,
) -> Result<Json<Vec<AttainmentResult>>, ApiError> {
    let tier = parse_tier(&body.tier)?;

    let query = CalculateIndirectQuery {
        survey_id: SurveyId::new(body.survey_id),
        tier,
        degree_id: DegreeId::new(body.degree_id),
    };

    let results = state.calculate_indirect_handler().handle(query).await?;
    Ok(Json(results))
}

/// GET /api/attainment/coverage/validate?degree_id=&tier=
pub async fn validate_coverage(
    State(state): State<ApiAppState>,
    Query(params): Query<ThresholdGroupParams>,
    _user: AuthenticatedUser,
) -> Result<Json<CoverageReport>, ApiError> {
    let tier = parse_tier(&params.tier)?;

    let report = state
        .validate_coverage_handler()
        .handle(ValidateCoverageQuery {
            degree_id: DegreeId::new(params.degree_id),
            tier,
        })
        .await?;
    Ok(Json(report))
}
