//! OpenAPI documentation generated by utoipa from handler annotations.

use utoipa::OpenApi;

use crate::error_response::ErrorBody;
use crate::handlers::{
    BulkJobStatusParams, BulkJobStatusResponse, BulkJobSubmitRequest, BulkJobSubmitResponse, HealthResponse, SearchParams,
    SearchResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Sentinel Screening API", version = "1.0.0", description = "Sanctions/watchlist entity screening"),
    paths(
        crate::handlers::search,
        crate::handlers::submit_bulk_job,
        crate::handlers::bulk_job_status,
        crate::handlers::get_config,
        crate::handlers::put_similarity_config,
        crate::handlers::put_weights_config,
        crate::handlers::reset_config,
        crate::handlers::healthz,
    ),
    components(schemas(
        SearchParams,
        SearchResponse,
        BulkJobSubmitRequest,
        BulkJobSubmitResponse,
        BulkJobStatusParams,
        BulkJobStatusResponse,
        HealthResponse,
        ErrorBody,
        sentinel_core::Entity,
        sentinel_core::EntitySource,
        sentinel_core::EntityType,
        sentinel_core::QueryEntityType,
        sentinel_core::ScoreBreakdown,
        sentinel_core::BulkJobItem,
        sentinel_core::BulkJobMatch,
        sentinel_core::BulkJobStatus,
        sentinel_core::BulkJobStatusSnapshot,
        sentinel_core::ScoringConfig,
        sentinel_core::SimilarityConfig,
        sentinel_core::WeightsConfig,
        sentinel_screen::SearchHit,
    )),
    tags(
        (name = "Search", description = "Single-query screening"),
        (name = "Batch", description = "Bulk screening jobs"),
        (name = "Admin", description = "Runtime scoring configuration"),
        (name = "System", description = "Health checks"),
    )
)]
pub struct ApiDoc;
