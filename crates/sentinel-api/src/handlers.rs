//! Route handlers for the screening API: single-query search, bulk-job
//! submission/status, and admin config.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use sentinel_core::{
    defaults, BulkJobItem, BulkJobMatch, BulkJobStatus, BulkJobStatusSnapshot, Entity, EntitySource, Error,
    QueryEntityType, SimilarityConfig, WeightsConfig,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error_response::ApiError;
use crate::state::AppState;

// =============================================================================
// SINGLE-QUERY SEARCH
// =============================================================================

#[derive(Debug, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct SearchParams {
    pub name: String,
    pub source: Option<EntitySource>,
    #[serde(rename = "type")]
    pub entity_type: Option<QueryEntityType>,
    pub limit: Option<usize>,
    #[serde(rename = "minMatch")]
    pub min_match: Option<f64>,
    pub trace: Option<bool>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub entities: Vec<sentinel_screen::SearchHit>,
    pub total_results: usize,
    #[serde(rename = "requestID")]
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<sentinel_core::ScoringTrace>,
}

/// Single-name screening query against the current index snapshot.
#[utoipa::path(
    get,
    path = "/v1/search",
    params(SearchParams),
    responses((status = 200, description = "Ranked matches", body = SearchResponse)),
    tag = "Search",
)]
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<impl IntoResponse, ApiError> {
    if params.name.trim().is_empty() {
        return Err(Error::InvalidInput("name must not be empty".to_string()).into());
    }

    let limit = params.limit.unwrap_or(defaults::SEARCH_DEFAULT_LIMIT);
    let config = state.config_store.load();
    let min_match = params.min_match.unwrap_or(config.weights.min_match);
    let trace = params.trace.unwrap_or(false);

    let outcome = tokio::task::spawn_blocking(move || {
        sentinel_screen::search(&state.index, &params.name, params.source, params.entity_type, limit, min_match, trace, &config)
    })
    .await
    .map_err(|e| Error::Internal(e.to_string()))?;

    Ok(Json(SearchResponse {
        total_results: outcome.total_results,
        entities: outcome.entities,
        request_id: Uuid::now_v7(),
        trace: outcome.trace,
    }))
}

// =============================================================================
// BULK JOB SUBMIT
// =============================================================================

/// `POST /v2/batch/bulk-job` body: exactly one of `items` or `s3InputPath`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobSubmitRequest {
    pub job_name: String,
    pub items: Option<Vec<BulkJobItem>>,
    pub s3_input_path: Option<String>,
    #[serde(default = "default_min_match")]
    pub min_match: f64,
    #[serde(default = "default_bulk_job_limit")]
    pub limit: usize,
}

fn default_min_match() -> f64 {
    defaults::MIN_MATCH
}

fn default_bulk_job_limit() -> usize {
    defaults::BULK_JOB_DEFAULT_LIMIT
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobSubmitResponse {
    pub job_id: Uuid,
    pub status: BulkJobStatus,
    pub total_items: u64,
    pub submitted_at: DateTime<Utc>,
}

impl From<BulkJobStatusSnapshot> for BulkJobSubmitResponse {
    fn from(s: BulkJobStatusSnapshot) -> Self {
        Self { job_id: s.job_id, status: s.status, total_items: s.total_items, submitted_at: s.submitted_at }
    }
}

/// Submits a bulk screening job. Items may be supplied inline or as an
/// NDJSON object-store path; returns immediately with `SUBMITTED`.
#[utoipa::path(
    post,
    path = "/v2/batch/bulk-job",
    request_body = BulkJobSubmitRequest,
    responses((status = 202, description = "Job accepted", body = BulkJobSubmitResponse)),
    tag = "Batch",
)]
pub async fn submit_bulk_job(
    State(state): State<AppState>,
    Json(body): Json<BulkJobSubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match (body.items, body.s3_input_path) {
        (Some(_), Some(_)) => Err(Error::InvalidInput("exactly one of items or s3InputPath must be set".to_string()).into()),
        (None, None) => Err(Error::InvalidInput("one of items or s3InputPath is required".to_string()).into()),
        (Some(items), None) => {
            let snapshot = state.jobs.submit_job(body.job_name, items, body.min_match, body.limit);
            Ok((StatusCode::ACCEPTED, Json(BulkJobSubmitResponse::from(snapshot))))
        }
        (None, Some(s3_input_path)) => {
            let snapshot = state.jobs.submit_job_from_s3(body.job_name, s3_input_path, body.min_match, body.limit)?;
            Ok((StatusCode::ACCEPTED, Json(BulkJobSubmitResponse::from(snapshot))))
        }
    }
}

// =============================================================================
// BULK JOB STATUS
// =============================================================================

#[derive(Debug, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct BulkJobStatusParams {
    #[serde(default)]
    pub matches: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BulkJobStatusResponse {
    #[serde(flatten)]
    pub snapshot: BulkJobStatusSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<BulkJobMatch>>,
}

/// Polls a bulk job's progress. `matches=true` additionally includes
/// accumulated matches, which can be large for big jobs.
#[utoipa::path(
    get,
    path = "/v2/batch/bulk-job/{jobId}",
    params(("jobId" = Uuid, Path, description = "Job id returned by submit"), BulkJobStatusParams),
    responses(
        (status = 200, description = "Job status", body = BulkJobStatusResponse),
        (status = 404, description = "Unknown job id"),
    ),
    tag = "Batch",
)]
pub async fn bulk_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<BulkJobStatusParams>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.jobs.job_status(job_id).ok_or_else(|| Error::NotFound(format!("no such job: {job_id}")))?;
    let matches = if params.matches { state.jobs.job_matches(job_id) } else { None };
    Ok(Json(BulkJobStatusResponse { snapshot, matches }))
}

// =============================================================================
// ADMIN CONFIG
// =============================================================================

/// Current scoring configuration (similarity tunables and factor weights).
#[utoipa::path(
    get,
    path = "/api/admin/config",
    responses((status = 200, description = "Current config", body = ScoringConfig)),
    tag = "Admin",
)]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(*state.config_store.load())
}

/// Replaces the similarity-tuning half of the config, validating ranges
/// first so a bad body never reaches the live scorer.
#[utoipa::path(
    put,
    path = "/api/admin/config/similarity",
    request_body = SimilarityConfig,
    responses(
        (status = 200, description = "Updated config", body = ScoringConfig),
        (status = 400, description = "Invalid configuration"),
    ),
    tag = "Admin",
)]
pub async fn put_similarity_config(
    State(state): State<AppState>,
    Json(similarity): Json<SimilarityConfig>,
) -> Result<impl IntoResponse, ApiError> {
    similarity.validate()?;
    let mut updated = *state.config_store.load();
    updated.similarity = similarity;
    state.config_store.store(updated);
    Ok(Json(updated))
}

/// Replaces the weights/thresholds half of the config, validating ranges
/// first so a bad body never reaches the live scorer.
#[utoipa::path(
    put,
    path = "/api/admin/config/weights",
    request_body = WeightsConfig,
    responses(
        (status = 200, description = "Updated config", body = ScoringConfig),
        (status = 400, description = "Invalid configuration"),
    ),
    tag = "Admin",
)]
pub async fn put_weights_config(
    State(state): State<AppState>,
    Json(weights): Json<WeightsConfig>,
) -> Result<impl IntoResponse, ApiError> {
    weights.validate()?;
    let mut updated = *state.config_store.load();
    updated.weights = weights;
    state.config_store.store(updated);
    Ok(Json(updated))
}

/// Restores compile-time default weights and similarity tunables.
#[utoipa::path(
    post,
    path = "/api/admin/config/reset",
    responses((status = 200, description = "Config reset to defaults", body = ScoringConfig)),
    tag = "Admin",
)]
pub async fn reset_config(State(state): State<AppState>) -> impl IntoResponse {
    state.config_store.reset();
    Json(*state.config_store.load())
}

// =============================================================================
// HEALTH
// =============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub indexed_entities: usize,
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "System",
)]
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse { status: "healthy", version: env!("CARGO_PKG_VERSION"), indexed_entities: state.index.len() })
}

/// Replaces the in-memory index with `entities`, deduplicating source rows
/// via the entity merger first.
///
/// The watchlist loader itself (CSV parsing, scheduled refresh) is an
/// external collaborator; this is the hand-off point it pushes normalized
/// entities through. Not part of the documented external interface.
pub async fn put_index(State(state): State<AppState>, Json(entities): Json<Vec<Entity>>) -> impl IntoResponse {
    let merged = sentinel_core::merge(entities);
    let count = merged.len();
    state.index.replace_all(merged, state.config_store.load().similarity.keep_stopwords);
    Json(serde_json::json!({ "indexed": count }))
}
