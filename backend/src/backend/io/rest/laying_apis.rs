//! Egg-production endpoints for layer flocks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CreateLayingRecordRequest, LayingRecordListResponse, LayingRecordResponse};
use tracing::info;

use super::auth_apis::CurrentUser;
use super::mappers::laying_mapper::LayingMapper;
use super::{domain_error_response, AppState};

/// Axum handler for GET /api/flocks/:flock_id/laying
pub async fn list_records(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/flocks/{}/laying", flock_id);

    match state.laying_service.list_records(&flock_id) {
        Ok(result) => (
            StatusCode::OK,
            Json(LayingRecordListResponse {
                records: result.records.into_iter().map(LayingMapper::to_dto).collect(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for POST /api/flocks/:flock_id/laying
pub async fn create_record(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
    CurrentUser(principal): CurrentUser,
    Json(request): Json<CreateLayingRecordRequest>,
) -> impl IntoResponse {
    info!("POST /api/flocks/{}/laying - date: {}", flock_id, request.date);

    let created_by = principal.map(|p| p.username).unwrap_or_default();
    let command = LayingMapper::to_create_command(flock_id, request, created_by);

    match state.laying_service.create_record(command) {
        Ok(result) => (
            StatusCode::CREATED,
            Json(LayingRecordResponse {
                record: LayingMapper::to_dto(result.record),
                success_message: "Production day logged".to_string(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
