//! Flock endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{CreateFlockRequest, FlockListResponse, FlockResponse, UpdateFlockRequest};
use tracing::info;

use super::mappers::flock_mapper::FlockMapper;
use super::{domain_error_response, AppState};
use crate::backend::domain::commands::flocks::FlockListQuery;
use crate::backend::domain::models::flock::FlockType;

/// Query parameters for the flock list endpoint.
#[derive(Deserialize, Debug)]
pub struct FlockListParams {
    pub flock_type: Option<String>,
}

/// Axum handler for GET /api/flocks
pub async fn list_flocks(
    State(state): State<AppState>,
    Query(params): Query<FlockListParams>,
) -> impl IntoResponse {
    info!("GET /api/flocks - params: {:?}", params);

    let flock_type = match params.flock_type.as_deref() {
        None => None,
        Some(raw) => match FlockType::parse(raw) {
            Some(flock_type) => Some(flock_type),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Unknown flock type: {raw}"),
                )
                    .into_response()
            }
        },
    };

    match state.flock_service.list_flocks(FlockListQuery { flock_type }) {
        Ok(result) => (
            StatusCode::OK,
            Json(FlockListResponse {
                flocks: result.flocks.into_iter().map(FlockMapper::to_dto).collect(),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for POST /api/flocks
pub async fn create_flock(
    State(state): State<AppState>,
    Json(request): Json<CreateFlockRequest>,
) -> impl IntoResponse {
    info!("POST /api/flocks - name: {}", request.name);

    match state
        .flock_service
        .create_flock(FlockMapper::to_create_command(request))
    {
        Ok(result) => {
            let flock = FlockMapper::to_dto(result.flock);
            (
                StatusCode::CREATED,
                Json(FlockResponse {
                    success_message: format!("Flock '{}' created successfully", flock.name),
                    flock,
                }),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for GET /api/flocks/:flock_id
pub async fn get_flock(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/flocks/{}", flock_id);

    match state.flock_service.get_flock(&flock_id) {
        Ok(flock) => (
            StatusCode::OK,
            Json(FlockResponse {
                success_message: String::new(),
                flock: FlockMapper::to_dto(flock),
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for PUT /api/flocks/:flock_id
pub async fn update_flock(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
    Json(request): Json<UpdateFlockRequest>,
) -> impl IntoResponse {
    info!("PUT /api/flocks/{}", flock_id);

    match state
        .flock_service
        .update_flock(FlockMapper::to_update_command(flock_id, request))
    {
        Ok(result) => {
            let flock = FlockMapper::to_dto(result.flock);
            (
                StatusCode::OK,
                Json(FlockResponse {
                    success_message: format!("Flock '{}' updated successfully", flock.name),
                    flock,
                }),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// Axum handler for DELETE /api/flocks/:flock_id
pub async fn delete_flock(
    State(state): State<AppState>,
    Path(flock_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/flocks/{}", flock_id);

    match state.flock_service.delete_flock(&flock_id) {
        Ok(result) => (StatusCode::OK, Json(result.success_message)).into_response(),
        Err(e) => domain_error_response(e),
    }
}
