//! HTTP routes for the OBE Hub API.

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    calculate_direct, calculate_indirect, create_threshold, delete_threshold, get_matrix, health,
    list_outcomes, list_thresholds, mapping_coverage, toggle_mapping, update_threshold,
    validate_coverage, ApiAppState,
};

/// Creates the API router with all routes.
pub fn api_router(state: ApiAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Outcomes
        .route("/api/outcomes/:tier", get(list_outcomes))
        // Mapping matrix
        .route("/api/mappings/toggle", post(toggle_mapping))
        .route("/api/mappings/matrix", get(get_matrix))
        .route("/api/mappings/coverage", get(mapping_coverage))
        // Thresholds
        .route("/api/thresholds", get(list_thresholds).post(create_threshold))
        .route(
            "/api/thresholds/:id",
            put(update_threshold).delete(delete_threshold),
        )
        // Attainment
        .route("/api/attainment/direct/calculate", post(calculate_direct))
        .route("/api/attainment/indirect/calculate", post(calculate_indirect))
        .route("/api/attainment/coverage/validate", get(validate_coverage))
        .with_state(state)
}
