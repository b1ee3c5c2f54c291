//! # REST API Interface Layer
//!
//! HTTP endpoints for the flock tracker. This layer handles request and
//! response serialization, translation between shared DTOs and domain
//! commands, and mapping domain errors to HTTP status codes. Business logic
//! stays in the domain layer; nothing here touches storage directly.
//!
//! Validation failures come back as HTTP 400 with the full list of field
//! violations, so a form can render a message per field. Missing flocks and
//! records are 404; storage trouble is 500.

pub mod auth_apis;
pub mod flock_apis;
pub mod laying_apis;
pub mod mappers;
pub mod record_apis;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{FieldViolation, ValidationErrorResponse};
use tracing::error;

use crate::backend::domain::catalog::Catalogs;
use crate::backend::domain::errors::DomainError;
use crate::backend::domain::flock_service::FlockService;
use crate::backend::domain::laying_service::LayingService;
use crate::backend::domain::record_service::RecordService;
use crate::backend::domain::session_service::SessionService;

/// Application state shared across handlers. Carried explicitly through
/// axum's state extractor; there is no ambient process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub flock_service: FlockService,
    pub record_service: RecordService,
    pub laying_service: LayingService,
    pub session_service: SessionService,
    pub catalogs: Arc<Catalogs>,
}

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth_apis::login))
        .route("/api/auth/session", get(auth_apis::session))
        .route("/api/catalogs", get(record_apis::get_catalogs))
        .route(
            "/api/flocks",
            get(flock_apis::list_flocks).post(flock_apis::create_flock),
        )
        .route(
            "/api/flocks/:flock_id",
            get(flock_apis::get_flock)
                .put(flock_apis::update_flock)
                .delete(flock_apis::delete_flock),
        )
        .route(
            "/api/flocks/:flock_id/records",
            get(record_apis::list_records)
                .post(record_apis::create_record)
                .delete(record_apis::delete_records),
        )
        .route(
            "/api/flocks/:flock_id/records/defaults",
            get(record_apis::record_defaults),
        )
        .route(
            "/api/flocks/:flock_id/records/schema",
            get(record_apis::record_schema),
        )
        .route(
            "/api/flocks/:flock_id/records/:record_id",
            get(record_apis::get_record)
                .put(record_apis::update_record)
                .delete(record_apis::delete_record),
        )
        .route(
            "/api/flocks/:flock_id/laying",
            get(laying_apis::list_records).post(laying_apis::create_record),
        )
        .with_state(state)
}

/// Translate a domain error into an HTTP response.
pub(crate) fn domain_error_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound(what) => {
            (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
        }
        DomainError::Invalid(failures) => {
            let errors = failures
                .violations
                .into_iter()
                .map(|v| FieldViolation {
                    field: v.field,
                    code: v.code,
                    message: v.message,
                })
                .collect();
            (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response()
        }
        DomainError::Storage(e) => {
            error!("Storage error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use shared::{
        CreateFlockRequest, CreateRecordRequest, FlockType, LoginRequest, LoginResponse,
        RecordListResponse, RecordResponse, SessionResponse,
    };

    use crate::backend::domain::session_service::Credential;
    use crate::backend::storage::csv::test_utils::temp_connection;

    fn setup_test_state() -> (AppState, TempDir) {
        let (connection, temp_dir) = temp_connection();
        let catalogs = Arc::new(Catalogs::default());
        let flock_service = FlockService::new(connection.clone());
        let record_service =
            RecordService::new(connection.clone(), flock_service.clone(), catalogs.clone());
        let laying_service = LayingService::new(connection.clone(), flock_service.clone());
        let session_service = SessionService::new(
            connection,
            vec![Credential {
                username: "test".to_string(),
                password: "test123".to_string(),
                display_name: "Test User".to_string(),
            }],
        );
        (
            AppState {
                flock_service,
                record_service,
                laying_service,
                session_service,
                catalogs,
            },
            temp_dir,
        )
    }

    fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(
        response: axum::response::Response,
    ) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_flock_request() -> CreateFlockRequest {
        CreateFlockRequest {
            name: "Alpha Flock".to_string(),
            breed: "Leghorn".to_string(),
            flock_type: FlockType::Grower,
            start_date: "2025-01-01".to_string(),
            initial_population: 2000,
        }
    }

    #[tokio::test]
    async fn test_login_and_session_round_trip() {
        let (state, _temp_dir) = setup_test_state();

        let response = router(state.clone())
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                &LoginRequest {
                    username: "test".to_string(),
                    password: "test123".to_string(),
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = response_json(response).await;
        let token = login.token.expect("token should be issued");
        assert_eq!(login.display_name.as_deref(), Some("Test User"));

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/auth/session")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let session: SessionResponse = response_json(response).await;
        assert!(session.authenticated);
        assert_eq!(session.principal.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (state, _temp_dir) = setup_test_state();

        let response = router(state)
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                &LoginRequest {
                    username: "test".to_string(),
                    password: "wrong".to_string(),
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let login: LoginResponse = response_json(response).await;
        assert!(login.token.is_none());
    }

    #[tokio::test]
    async fn test_record_round_trip_stamps_principal() {
        let (state, _temp_dir) = setup_test_state();

        let response = router(state.clone())
            .oneshot(json_request("POST", "/api/flocks", &create_flock_request()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let flock: shared::FlockResponse = response_json(response).await;
        let flock_id = flock.flock.id;

        let login = state
            .session_service
            .login(crate::backend::domain::commands::sessions::LoginCommand {
                username: "test".to_string(),
                password: "test123".to_string(),
            })
            .unwrap();
        let token = login.session.unwrap().token;

        let record_request = CreateRecordRequest {
            date: "2025-01-01".to_string(),
            feed_grams: 1500.0,
            dead_count: 5.0,
            medication_ids: Some(vec!["puretubig".to_string()]),
            medications_text: None,
            vaccination_ids: None,
            vaccinations_text: Some("Ma5+clone30".to_string()),
        };
        let mut request = json_request(
            "POST",
            &format!("/api/flocks/{flock_id}/records"),
            &record_request,
        );
        request.headers_mut().insert(
            "authorization",
            format!("Bearer {token}").parse().unwrap(),
        );
        let response = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: RecordResponse = response_json(response).await;
        assert_eq!(created.record.day_age, 1);
        assert_eq!(created.record.current_population, 1995);
        assert_eq!(created.record.created_by, "test");
        assert_eq!(created.record.medications[0].slug, "puretubig");
        assert_eq!(created.record.vaccinations[0].slug, "ma5+clone30");

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/flocks/{flock_id}/records"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed: RecordListResponse = response_json(response).await;
        assert_eq!(listed.records.len(), 1);
        assert_eq!(listed.records[0].id, created.record.id);
    }

    #[tokio::test]
    async fn test_validation_failure_lists_every_field() {
        let (state, _temp_dir) = setup_test_state();

        let response = router(state.clone())
            .oneshot(json_request("POST", "/api/flocks", &create_flock_request()))
            .await
            .unwrap();
        let flock: shared::FlockResponse = response_json(response).await;

        let bad_request = CreateRecordRequest {
            date: String::new(),
            feed_grams: -1.0,
            dead_count: 2.5,
            medication_ids: None,
            medications_text: None,
            vaccination_ids: None,
            vaccinations_text: None,
        };
        let response = router(state)
            .oneshot(json_request(
                "POST",
                &format!("/api/flocks/{}/records", flock.flock.id),
                &bad_request,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ValidationErrorResponse = response_json(response).await;
        let mut fields = body.field_names();
        fields.sort();
        assert_eq!(fields, vec!["date", "dead_count", "feed_grams"]);
    }

    #[tokio::test]
    async fn test_missing_flock_is_404() {
        let (state, _temp_dir) = setup_test_state();

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/flocks/flock::missing/records")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unauthenticated_record_has_empty_created_by() {
        let (state, _temp_dir) = setup_test_state();

        let response = router(state.clone())
            .oneshot(json_request("POST", "/api/flocks", &create_flock_request()))
            .await
            .unwrap();
        let flock: shared::FlockResponse = response_json(response).await;

        let record_request = CreateRecordRequest {
            date: "2025-01-01".to_string(),
            feed_grams: 1500.0,
            dead_count: 0.0,
            medication_ids: None,
            medications_text: None,
            vaccination_ids: None,
            vaccinations_text: None,
        };
        let response = router(state)
            .oneshot(json_request(
                "POST",
                &format!("/api/flocks/{}/records", flock.flock.id),
                &record_request,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: RecordResponse = response_json(response).await;
        assert_eq!(created.record.created_by, "");
    }
}
