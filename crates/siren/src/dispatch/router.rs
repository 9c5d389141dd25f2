use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AccidentId, AccidentReport, Decision, ResponderId, ResponderIdentity, Role};
use super::repository::{AccidentRepository, Geocoder, RepositoryError, ResponderDirectory};
use super::service::{AccidentDispatchService, DispatchServiceError};

/// Header pair the authenticating gateway injects for responder calls.
pub const RESPONDER_ID_HEADER: &str = "x-responder-id";
pub const RESPONDER_ROLE_HEADER: &str = "x-responder-role";

/// Router builder exposing HTTP endpoints for reporting and confirmation.
pub fn dispatch_router<G, D, R>(service: Arc<AccidentDispatchService<G, D, R>>) -> Router
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    Router::new()
        .route("/api/v1/accidents", post(report_handler::<G, D, R>))
        .route(
            "/api/v1/accidents/assigned",
            get(assigned_handler::<G, D, R>),
        )
        .route(
            "/api/v1/accidents/:accident_id/accept",
            put(accept_handler::<G, D, R>),
        )
        .route(
            "/api/v1/accidents/:accident_id/reject",
            put(reject_handler::<G, D, R>),
        )
        .with_state(service)
}

pub(crate) async fn report_handler<G, D, R>(
    State(service): State<Arc<AccidentDispatchService<G, D, R>>>,
    axum::Json(report): axum::Json<AccidentReport>,
) -> Response
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    match service.report(report) {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AssignedQuery {
    /// Role filter; defaults to the caller's own role.
    pub(crate) role: Option<String>,
}

pub(crate) async fn assigned_handler<G, D, R>(
    State(service): State<Arc<AccidentDispatchService<G, D, R>>>,
    Query(query): Query<AssignedQuery>,
    headers: HeaderMap,
) -> Response
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    let identity = match caller_identity(&headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let role = match query.role {
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => role,
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => identity.role,
    };

    match service.assigned(&identity, role) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_handler<G, D, R>(
    State(service): State<Arc<AccidentDispatchService<G, D, R>>>,
    Path(accident_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    respond(service, accident_id, headers, Decision::Accepted)
}

pub(crate) async fn reject_handler<G, D, R>(
    State(service): State<Arc<AccidentDispatchService<G, D, R>>>,
    Path(accident_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    respond(service, accident_id, headers, Decision::Rejected)
}

fn respond<G, D, R>(
    service: Arc<AccidentDispatchService<G, D, R>>,
    accident_id: String,
    headers: HeaderMap,
    decision: Decision,
) -> Response
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    let identity = match caller_identity(&headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let id = AccidentId(accident_id);
    match service.respond(&id, &identity.id, decision) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn caller_identity(headers: &HeaderMap) -> Result<ResponderIdentity, Response> {
    let id = headers
        .get(RESPONDER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let role = headers
        .get(RESPONDER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Role>().ok());

    match (id, role) {
        (Some(id), Some(role)) => Ok(ResponderIdentity {
            id: ResponderId(id.to_string()),
            role,
        }),
        _ => {
            let payload = json!({ "error": "missing or invalid responder identity" });
            Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
        }
    }
}

fn error_response(error: DispatchServiceError) -> Response {
    match error {
        DispatchServiceError::InvalidAddress => {
            let payload = json!({ "error": "invalid accident address" });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        DispatchServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "accident not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        DispatchServiceError::Unauthorized | DispatchServiceError::RoleMismatch { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        DispatchServiceError::AlreadyDecided { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
