//! Daily record endpoints, plus the form schema and catalogs they render
//! from.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{
    CreateRecordRequest, DeleteRecordsRequest, DeleteRecordsResponse, RecordListResponse,
    RecordResponse, UpdateRecordRequest,
};
use tracing::info;

use super::auth_apis::CurrentUser;
use super::mappers::record_mapper::RecordMapper;
use super::{domain_error_response, AppState};
use crate::backend::domain::commands::records::DeleteRecordsCommand;
use crate::backend::domain::schema::RECORD_FORM_SCHEMA;

/// Axum handler for GET /api/flocks/:flock_id/records
pub async fn list_records(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/flocks/{}/records", flock_id);

    match state.record_service.list_records(&flock_id) {
        Ok(result) => (
            StatusCode::OK,
            Json(RecordListResponse {
                records: result.records.into_iter().map(RecordMapper::to_dto).collect(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for GET /api/flocks/:flock_id/records/defaults
pub async fn record_defaults(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/flocks/{}/records/defaults", flock_id);

    match state.record_service.record_defaults(&flock_id) {
        Ok(result) => {
            (StatusCode::OK, Json(RecordMapper::defaults_to_dto(result))).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for GET /api/flocks/:flock_id/records/schema
pub async fn record_schema(Path(flock_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/flocks/{}/records/schema", flock_id);
    Json(RecordMapper::schema_to_dto(RECORD_FORM_SCHEMA))
}

/// Axum handler for GET /api/catalogs
pub async fn get_catalogs(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalogs");
    Json(RecordMapper::catalogs_to_dto(&state.catalogs))
}

/// Axum handler for POST /api/flocks/:flock_id/records
pub async fn create_record(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
    CurrentUser(principal): CurrentUser,
    Json(request): Json<CreateRecordRequest>,
) -> impl IntoResponse {
    info!("POST /api/flocks/{}/records - date: {}", flock_id, request.date);

    let created_by = principal.map(|p| p.username).unwrap_or_default();
    let command = RecordMapper::to_create_command(flock_id, request, created_by);

    match state.record_service.create_record(command) {
        Ok(result) => (
            StatusCode::CREATED,
            Json(RecordResponse {
                record: RecordMapper::to_dto(result.record),
                success_message: "Record added!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for GET /api/flocks/:flock_id/records/:record_id
pub async fn get_record(
    State(state): State<AppState>,
    Path((flock_id, record_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/flocks/{}/records/{}", flock_id, record_id);

    match state.record_service.get_record(&flock_id, &record_id) {
        Ok(record) => (
            StatusCode::OK,
            Json(RecordResponse {
                record: RecordMapper::to_dto(record),
                success_message: String::new(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for PUT /api/flocks/:flock_id/records/:record_id
pub async fn update_record(
    State(state): State<AppState>,
    Path((flock_id, record_id)): Path<(String, String)>,
    Json(request): Json<UpdateRecordRequest>,
) -> impl IntoResponse {
    info!("PUT /api/flocks/{}/records/{}", flock_id, record_id);

    let command = RecordMapper::to_update_command(flock_id, record_id, request);
    match state.record_service.update_record(command) {
        Ok(result) => (
            StatusCode::OK,
            Json(RecordResponse {
                record: RecordMapper::to_dto(result.record),
                success_message: "Record updated".to_string(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for DELETE /api/flocks/:flock_id/records/:record_id
pub async fn delete_record(
    State(state): State<AppState>,
    Path((flock_id, record_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/flocks/{}/records/{}", flock_id, record_id);

    let command = DeleteRecordsCommand {
        flock_id,
        record_ids: vec![record_id.clone()],
    };
    match state.record_service.delete_records(command) {
        Ok(result) if result.deleted_count == 0 => {
            (StatusCode::NOT_FOUND, format!("record {record_id} not found")).into_response()
        }
        Ok(result) => (StatusCode::OK, Json(result.success_message)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for DELETE /api/flocks/:flock_id/records
pub async fn delete_records(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
    Json(request): Json<DeleteRecordsRequest>,
) -> impl IntoResponse {
    info!(
        "DELETE /api/flocks/{}/records - {} id(s)",
        flock_id,
        request.record_ids.len()
    );

    let command = DeleteRecordsCommand {
        flock_id,
        record_ids: request.record_ids,
    };
    match state.record_service.delete_records(command) {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteRecordsResponse {
                deleted_count: result.deleted_count,
                success_message: result.success_message,
                not_found_ids: result.not_found_ids,
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
