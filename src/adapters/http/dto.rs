//! HTTP DTOs for the OBE Hub API.
//!
//! The domain view models (matrix views, coverage reports, attainment
//! results) are already designed for serialization and are re-exported
//! directly; thresholds get a flat view struct so the wire shape stays
//! stable if the entity grows.

pub use crate::application::handlers::{CoverageSummary, MatrixView};
pub use crate::domain::attainment::AttainmentResult;
pub use crate::domain::coverage::{CoverageReport, Gap};
pub use crate::domain::outcome::Outcome;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::threshold::Threshold;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/mappings/toggle`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleMappingRequest {
    /// Tier pair label, `peo-plo` or `plo-clo`.
    pub pair: String,
    pub degree_id: i64,
    pub course_id: Option<i64>,
    pub row_id: i64,
    pub column_id: i64,
}

/// Body of `POST /api/thresholds`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThresholdRequest {
    pub degree_id: i64,
    /// Tier label, `peo`, `plo` or `clo`.
    pub tier: String,
    pub level_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub is_attained: bool,
}

/// Body of `PUT /api/thresholds/:id` (same shape as create).
pub type UpdateThresholdRequest = CreateThresholdRequest;

/// Body of `POST /api/attainment/direct/calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateDirectRequest {
    pub outcome_id: i64,
    pub tier: String,
    pub degree_id: i64,
    pub previous_percentage: Option<f64>,
}

/// Body of `POST /api/attainment/indirect/calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateIndirectRequest {
    pub survey_id: i64,
    pub tier: String,
    pub degree_id: i64,
}

/// Query string for scoped matrix endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixParams {
    pub pair: String,
    pub degree_id: i64,
    pub course_id: Option<i64>,
}

/// Query string for outcome listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListOutcomesParams {
    pub degree_id: i64,
    pub course_id: Option<i64>,
    pub search: Option<String>,
}

/// Query string for threshold group endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdGroupParams {
    pub degree_id: i64,
    pub tier: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Wire representation of a threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdView {
    pub id: i64,
    pub degree_id: i64,
    pub tier: String,
    pub level_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub is_attained: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Threshold> for ThresholdView {
    fn from(t: &Threshold) -> Self {
        Self {
            id: t.id().value(),
            degree_id: t.degree_id().value(),
            tier: t.tier().as_str().to_string(),
            level_name: t.level_name().to_string(),
            min_percentage: t.min().value(),
            max_percentage: t.max().value(),
            is_attained: t.is_attained(),
            created_at: t.created_at(),
            updated_at: t.updated_at(),
        }
    }
}

/// Response of `POST /api/mappings/toggle`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToggleMappingResponse {
    pub active: bool,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self {
            code: "INVALID_REFERENCE".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn overlap(message: impl Into<String>, conflicts: Vec<ThresholdView>) -> Self {
        Self {
            code: "THRESHOLD_OVERLAP".to_string(),
            message: message.into(),
            details: serde_json::to_value(conflicts)
                .ok()
                .map(|v| serde_json::json!({ "conflicts": v })),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            code: "STORAGE_TIMEOUT".to_string(),
            message: "Storage call exceeded its deadline".to_string(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
