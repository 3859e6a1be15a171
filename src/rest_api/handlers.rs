//! HTTP handlers for the REST API

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::carbon_aware::{Job, JobRequest, Region, SchedulingService};
use crate::history::{export_csv, export_filename, JobRecord};
use crate::Error;

use super::dto::{ErrorResponse, HealthResponse, SubmitResponse};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a crate error onto an HTTP status and JSON body
pub fn api_error(e: &Error) -> ApiError {
    let status = match e {
        Error::ValidationError(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::EmptyCatalog => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", e);
    }
    (status, Json(ErrorResponse::new(e.kind(), &e.to_string())))
}

/// Health check endpoint
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List the catalog snapshot
#[instrument(skip(state))]
pub async fn list_regions(
    State(state): State<Arc<SchedulingService>>,
) -> Result<Json<Vec<Region>>, ApiError> {
    state
        .get_regions()
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

/// Schedule a job and record it in the history
#[instrument(skip(state, payload))]
pub async fn submit_job(
    State(state): State<Arc<SchedulingService>>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected job submission body: {}", rejection.body_text());
        api_error(&Error::validation(rejection.body_text()))
    })?;
    let job = Job::try_from(request).map_err(|e| {
        warn!("Rejected job submission: {}", e);
        api_error(&e)
    })?;

    let (record, result) = state.submit(&job).await.map_err(|e| api_error(&e))?;
    info!(
        "Job {} placed in {} (history id {})",
        job.name, result.region.id, record.id
    );

    let trees_equivalent = result.trees_equivalent(state.scheduler().impact().trees_per_kg_saved);
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            record,
            result,
            trees_equivalent,
        }),
    ))
}

/// Job history, newest first
#[instrument(skip(state))]
pub async fn list_history(State(state): State<Arc<SchedulingService>>) -> Json<Vec<JobRecord>> {
    Json(state.history().list().await)
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<Arc<SchedulingService>>,
    Path(id): Path<u64>,
) -> Result<Json<JobRecord>, ApiError> {
    state
        .history()
        .get(id)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

#[instrument(skip(state))]
pub async fn delete_history(
    State(state): State<Arc<SchedulingService>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state
        .history()
        .delete(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| api_error(&e))
}

/// Job history as a CSV attachment
#[instrument(skip(state))]
pub async fn export_history(
    State(state): State<Arc<SchedulingService>>,
) -> Result<Response, ApiError> {
    let records = state.history().list().await;
    let csv = export_csv(&records).map_err(|e| api_error(&e))?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(Utc::now()));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
