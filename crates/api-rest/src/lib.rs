//! # API REST
//!
//! REST API implementation for the triage allocator.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, request validation)
//!
//! Uses `api-shared` for wire types and `triage-core` for allocation.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AssignPatientReq, AssignPatientRes, DischargeRes, FacilitiesRes, FacilityView, HealthRes,
    HealthService,
};
use triage_core::{AllocationService, IntakeService, PatientId, TriageError};

/// Application state shared across REST API handlers
///
/// Both services are cheap handles over shared state, so cloning the state per request is fine.
#[derive(Clone, Debug)]
pub struct AppState {
    pub allocation: AllocationService,
    pub intake: IntakeService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, assign_patient, list_facilities, discharge_patient),
    components(schemas(
        HealthRes,
        AssignPatientReq,
        AssignPatientRes,
        FacilitiesRes,
        FacilityView,
        DischargeRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with permissive CORS and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/assign_patient", post(assign_patient))
        .route("/facilities", get(list_facilities))
        .route("/patients/:id/discharge", post(discharge_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps core errors to HTTP responses, logging anything unexpected.
fn error_response(err: TriageError) -> (StatusCode, &'static str) {
    match err {
        TriageError::Types(e) => {
            tracing::warn!("Rejected request: {}", e);
            (StatusCode::BAD_REQUEST, "Invalid patient data")
        }
        TriageError::DuplicatePatient(id) => {
            tracing::warn!("Rejected duplicate patient {}", id);
            (StatusCode::CONFLICT, "Patient already admitted")
        }
        e => {
            tracing::error!("Allocation error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/assign_patient",
    request_body = AssignPatientReq,
    responses(
        (status = 200, description = "Allocation attempted", body = AssignPatientRes),
        (status = 400, description = "Missing or invalid triage level"),
        (status = 409, description = "Patient id already admitted"),
        (status = 500, description = "Internal server error")
    )
)]
/// Allocate an arriving patient
///
/// Derives the patient's needs from the triage level and requested resource labels, then
/// assigns the nearest facility able to meet them, displacing a less urgent patient when the
/// level allows. A patient nobody can take is reported in `unassigned`; that is still a
/// successful response.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - `esi` is missing, not an integer (numeric strings are accepted), or outside 1..=5,
/// - `id` is blank.
///
/// Returns `409 Conflict` if the id is already admitted.
#[axum::debug_handler]
async fn assign_patient(
    State(state): State<AppState>,
    Json(req): Json<AssignPatientReq>,
) -> Result<Json<AssignPatientRes>, (StatusCode, &'static str)> {
    tracing::debug!(
        "Received: id={:?}, esi={:?}, ressources={:?}",
        req.id,
        req.esi,
        req.ressources
    );

    let Some(request) = req.into_intake_request() else {
        return Err((StatusCode::BAD_REQUEST, "Missing or invalid esi"));
    };
    let intake = state.intake.admit_request(request).map_err(error_response)?;
    let patient_id = intake.patient.id.clone();

    let (outcome, facilities) = state
        .allocation
        .assign_reporting(vec![intake.patient])
        .map_err(error_response)?;

    Ok(Json(AssignPatientRes::new(
        &patient_id,
        &outcome,
        &facilities,
        intake.unrecognised,
    )))
}

#[utoipa::path(
    get,
    path = "/facilities",
    responses(
        (status = 200, description = "Current facility state", body = FacilitiesRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List every facility with its available resources and admitted count
#[axum::debug_handler]
async fn list_facilities(
    State(state): State<AppState>,
) -> Result<Json<FacilitiesRes>, (StatusCode, &'static str)> {
    let facilities = state.allocation.snapshot().map_err(error_response)?;
    Ok(Json(FacilitiesRes::new(&facilities)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/discharge",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient released (or was not admitted)", body = DischargeRes),
        (status = 400, description = "Blank patient id"),
        (status = 500, description = "Internal server error")
    )
)]
/// Discharge an admitted patient, returning their resources to the facility
#[axum::debug_handler]
async fn discharge_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DischargeRes>, (StatusCode, &'static str)> {
    let patient_id = PatientId::new(&id).map_err(|e| error_response(e.into()))?;
    let released_from = state
        .allocation
        .discharge(&patient_id)
        .map_err(error_response)?;

    Ok(Json(DischargeRes {
        patient_id: patient_id.to_string(),
        released_from: released_from.map(|f| f.value()),
    }))
}
