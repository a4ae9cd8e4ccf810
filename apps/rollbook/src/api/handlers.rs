//! # API Endpoint Handlers
//!
//! Each handler takes the registry lock once: writes hold the write lock
//! for the whole operation, reads share the read lock.

use super::{
    AppState,
    error::ApiError,
    types::{
        CountResponse, CreateStudentRequest, HealthResponse, MessageResponse, SeedResponse,
        StudentJson, UpdateStudentRequest,
    },
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};
use rollbook_core::{Roll, query, seed};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// All students in insertion order.
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentJson>>, ApiError> {
    let registry = state.registry.read().await;
    let records = query::list_all(&registry)?;
    Ok(Json(StudentJson::from_records(&records)))
}

/// All students ranked by percentage.
pub async fn sorted_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentJson>>, ApiError> {
    let registry = state.registry.read().await;
    let records = query::list_sorted(&registry)?;
    Ok(Json(StudentJson::from_records(&records)))
}

/// Number of students.
pub async fn count_handler(State(state): State<AppState>) -> Result<Json<CountResponse>, ApiError> {
    let registry = state.registry.read().await;
    let count = query::get_count(&registry)?;
    Ok(Json(CountResponse { count }))
}

/// One student by roll.
pub async fn get_handler(
    State(state): State<AppState>,
    roll: Result<Path<u64>, PathRejection>,
) -> Result<Json<StudentJson>, ApiError> {
    let Path(roll) = roll?;
    let registry = state.registry.read().await;
    let record = query::get_one(&registry, Roll(roll))?;
    Ok(Json(StudentJson::from(&record)))
}

// =============================================================================
// WRITE HANDLERS
// =============================================================================

/// Create a student.
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let draft = request.to_draft()?;
    if draft.has_out_of_range_marks() {
        tracing::warn!(
            event = "marks_clamped",
            roll = %draft.roll,
            "Marks outside 0..=100 were clamped"
        );
    }

    let mut registry = state.registry.write().await;
    let record = registry.create(draft)?;
    tracing::info!(event = "student_created", roll = %record.roll(), grade = %record.grade());

    Ok((StatusCode::CREATED, Json(StudentJson::from(&record))))
}

/// Merge supplied fields into a student.
pub async fn update_handler(
    State(state): State<AppState>,
    roll: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<StudentJson>, ApiError> {
    let Path(roll) = roll?;
    let Json(request) = body?;
    let patch = request.to_patch()?;
    if patch.has_out_of_range_marks() {
        tracing::warn!(event = "marks_clamped", roll, "Marks outside 0..=100 were clamped");
    }

    let mut registry = state.registry.write().await;
    let record = registry.update(Roll(roll), &patch)?;
    tracing::info!(event = "student_updated", roll, grade = %record.grade());

    Ok(Json(StudentJson::from(&record)))
}

/// Delete a student.
pub async fn delete_handler(
    State(state): State<AppState>,
    roll: Result<Path<u64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(roll) = roll?;
    let mut registry = state.registry.write().await;
    registry.delete(Roll(roll))?;
    tracing::info!(event = "student_deleted", roll);

    Ok(Json(MessageResponse {
        message: format!("Student {roll} deleted"),
    }))
}

/// Load the sample batch.
pub async fn seed_handler(State(state): State<AppState>) -> Result<Json<SeedResponse>, ApiError> {
    let mut registry = state.registry.write().await;
    let report = seed(&mut registry)?;
    tracing::info!(
        event = "seed_loaded",
        added = report.added,
        skipped = report.skipped.len()
    );

    Ok(Json(SeedResponse::from(&report)))
}

// =============================================================================
// FALLBACKS
// =============================================================================

/// Any path without a route.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// A known path hit with a method it does not serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
