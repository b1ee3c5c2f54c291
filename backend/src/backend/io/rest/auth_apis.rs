//! Sign-in and session endpoints, plus the request principal extractor.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use shared::{LoginRequest, LoginResponse, SessionResponse};
use tracing::{error, info};

use super::AppState;
use crate::backend::domain::commands::sessions::LoginCommand;
use crate::backend::domain::models::session::Principal;

/// The principal behind the request's bearer token, if any. Extraction never
/// rejects: unauthenticated requests simply carry `None`, and each handler
/// decides what that means.
pub struct CurrentUser(pub Option<Principal>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .and_then(|token| state.session_service.authenticate(token));
        Ok(CurrentUser(principal))
    }
}

/// Axum handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - username: {}", request.username);

    match state.session_service.login(LoginCommand {
        username: request.username,
        password: request.password,
    }) {
        Ok(result) => {
            let response = LoginResponse {
                token: result.session.as_ref().map(|s| s.token.clone()),
                expires_at: result.session.as_ref().map(|s| s.expires_at.to_rfc3339()),
                display_name: result
                    .session
                    .as_ref()
                    .map(|s| s.principal.display_name.clone()),
                message: result.message,
            };
            let status = if response.token.is_some() {
                StatusCode::OK
            } else {
                StatusCode::UNAUTHORIZED
            };
            (status, Json(response)).into_response()
        }
        Err(e) => {
            error!("Error signing in: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error signing in").into_response()
        }
    }
}

/// Axum handler for GET /api/auth/session
pub async fn session(CurrentUser(principal): CurrentUser) -> impl IntoResponse {
    Json(SessionResponse {
        authenticated: principal.is_some(),
        principal: principal.map(|p| p.username),
    })
}
