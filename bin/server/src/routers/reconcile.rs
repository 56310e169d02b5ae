use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::Json, routing::post, Router};
use promptlab_core::{Comparison, PromptLabError, ReconciliationReport};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    dto::{
        CompareRequest, DiffRequest, DiffResponse, ReconcileBatchRequest, ReconcileBatchResponse,
        ReconcileCaseRequest, ReconstructRequest, ReconstructResponse, Result as ApiResult,
    },
    service::ReconcileService,
};

/// Create reconcile router
pub fn create_router() -> Router {
    Router::new()
        .route("/reconstruct", post(reconstruct))
        .route("/compare", post(compare))
        .route("/diff", post(diff))
        .route("/case", post(reconcile_case))
        .route("/cases", post(reconcile_cases))
}

/// Status plus an error body
type ApiError = (StatusCode, Json<ApiResult>);

fn rejected(error: PromptLabError) -> ApiError {
    warn!(%error, "Rejected reconciliation request");
    (StatusCode::BAD_REQUEST, Json(ApiResult::error(error.to_string())))
}

fn validate(request: &impl Validate) -> Result<(), ApiError> {
    request.validate().map_err(|error| {
        warn!(%error, "Request failed validation");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResult::error(error.to_string())),
        )
    })
}

/// Recover a template from rendered text and its parameters
#[instrument(skip_all)]
async fn reconstruct(
    Extension(service): Extension<Arc<ReconcileService>>,
    Json(request): Json<ReconstructRequest>,
) -> Result<Json<ReconstructResponse>, ApiError> {
    validate(&request)?;
    let template = service
        .reconstruct(&request.rendered_text, &request.parameters)
        .map_err(rejected)?;
    Ok(Json(ReconstructResponse { template }))
}

/// Compare a template and parameter set against the reference
#[instrument(skip_all)]
async fn compare(
    Extension(service): Extension<Arc<ReconcileService>>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Comparison>, ApiError> {
    validate(&request)?;
    let comparison = service
        .compare(
            &request.reconstructed_template,
            &request.reference_template,
            &request.case_parameters,
            &request.reference_parameters,
        )
        .map_err(rejected)?;
    Ok(Json(comparison))
}

/// Line diff between two templates
#[instrument(skip_all)]
async fn diff(
    Extension(service): Extension<Arc<ReconcileService>>,
    Json(request): Json<DiffRequest>,
) -> Result<Json<DiffResponse>, ApiError> {
    validate(&request)?;
    if !service.can_diff(&request.old_text, &request.new_text) {
        warn!(max_diff_lines = ?service.max_diff_lines(), "Diff input exceeds line cap");
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ApiResult::error("Templates exceed the diff line limit")),
        ));
    }
    Ok(Json(service.diff(&request.old_text, &request.new_text)))
}

/// Reconcile a single case against the active prompt
#[instrument(skip_all)]
async fn reconcile_case(
    Extension(service): Extension<Arc<ReconcileService>>,
    Json(request): Json<ReconcileCaseRequest>,
) -> Result<Json<ReconciliationReport>, ApiError> {
    validate(&request)?;
    let report = service
        .reconcile_case(&request.case, &request.reference, request.include_diff)
        .map_err(rejected)?;

    if report.is_outdated() {
        info!(
            case_id = ?report.case_id,
            templates_match = report.comparison.templates_match,
            parameters_match = report.comparison.parameters_match,
            "Case uses an outdated prompt"
        );
    }
    Ok(Json(report))
}

/// Reconcile a list of cases against the active prompt
#[instrument(skip_all)]
async fn reconcile_cases(
    Extension(service): Extension<Arc<ReconcileService>>,
    Json(request): Json<ReconcileBatchRequest>,
) -> Result<Json<ReconcileBatchResponse>, ApiError> {
    validate(&request)?;
    let reports = service
        .reconcile_batch(&request.cases, &request.reference)
        .map_err(rejected)?;

    let outdated = reports.iter().filter(|report| report.is_outdated()).count();
    info!(cases = reports.len(), outdated, "Reconciled case batch");
    Ok(Json(ReconcileBatchResponse { reports, outdated }))
}
