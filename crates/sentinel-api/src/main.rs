//! sentinel-api - HTTP API server for the sentinel screening engine

mod error_response;
mod handlers;
mod openapi;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use sentinel_core::{ConfigStore, LocalFsObjectStore, ObjectStore};
use sentinel_jobs::BulkJobManager;
use sentinel_screen::Index;
use state::AppState;

/// Time-ordered UUIDv7 request correlation ID, propagated as `x-request-id`
/// so a single screening request can be traced through logs end to end.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// `ALLOWED_ORIGINS` is a comma-separated list; entries that don't parse as
/// header values are logged and dropped rather than failing startup.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![HeaderValue::from_static("http://localhost:3000")];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            warn!("rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "Too Many Requests",
                    "message": "rate limit exceeded, please retry later",
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::ApiDoc::openapi())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/v1/search", get(handlers::search))
        .route("/v2/batch/bulk-job", post(handlers::submit_bulk_job))
        .route("/v2/batch/bulk-job/:jobId", get(handlers::bulk_job_status))
        .route("/api/admin/config", get(handlers::get_config))
        .route("/api/admin/config/similarity", put(handlers::put_similarity_config))
        .route("/api/admin/config/weights", put(handlers::put_weights_config))
        .route("/api/admin/config/reset", post(handlers::reset_config))
        .route("/api/admin/index", put(handlers::put_index))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        })
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // LOG_FORMAT: "json" or "text" (default "text"). RUST_LOG: standard env filter.
    // No file-rotation option here (unlike some sibling services) since this
    // binary has no tracing-appender dependency; console output only.
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "sentinel_api=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // `results_root` is a URI under the configured object store's scheme
    // (e.g. "file://results"); `SENTINEL_RESULTS_DIR` is where that scheme
    // resolves to on disk for the local filesystem backend.
    let results_root = std::env::var("SENTINEL_RESULTS_ROOT").unwrap_or_else(|_| "file://results".to_string());
    let object_store: Arc<dyn ObjectStore> =
        Arc::new(LocalFsObjectStore::new(std::env::var("SENTINEL_RESULTS_DIR").unwrap_or_else(|_| ".".to_string())));

    let index = Arc::new(Index::new());
    let config_store = ConfigStore::default();
    let jobs = BulkJobManager::new(index.clone(), config_store.clone(), object_store.clone(), results_root);
    let rate_limiter = state::rate_limiter_from_env();

    let state = AppState { index, config_store, jobs, object_store, rate_limiter };
    let app = router(state);

    let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(sentinel_core::defaults::SERVER_PORT);
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!(%addr, "starting sentinel-api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sentinel_core::InMemoryObjectStore;
    use serde_json::{json, Value};

    use super::*;

    async fn spawn_test_server() -> String {
        let index = Arc::new(Index::new());
        let config_store = ConfigStore::default();
        let object_store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let jobs = BulkJobManager::new(index.clone(), config_store.clone(), object_store.clone(), "mem://results");
        let state = AppState { index, config_store, jobs, object_store, rate_limiter: None };
        let app = router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn healthz_reports_healthy() {
        let base_url = spawn_test_server().await;
        let resp = reqwest::get(format!("{base_url}/healthz")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn loaded_entity_is_found_by_search() {
        let base_url = spawn_test_server().await;
        let client = reqwest::Client::new();

        let entity = json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "sourceId": "SDN-1",
            "source": "OFAC_SDN",
            "type": "PERSON",
            "name": "Nicolas Maduro",
            "altNames": [],
            "detail": null,
            "contact": null,
            "addresses": [],
            "cryptoAddresses": [],
            "governmentIds": [],
            "sanctionsInfo": null,
            "remarks": null,
        });
        let resp = client.put(format!("{base_url}/api/admin/index")).json(&[entity]).send().await.unwrap();
        assert_eq!(resp.status(), 200);

        let resp = client.get(format!("{base_url}/v1/search?name=Nicolas+Maduro")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["totalResults"], 1);
        assert!((body["entities"][0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn search_requires_non_empty_name() {
        let base_url = spawn_test_server().await;
        let resp = reqwest::get(format!("{base_url}/v1/search?name=")).await.unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn bulk_job_rejects_both_items_and_s3_path() {
        let base_url = spawn_test_server().await;
        let client = reqwest::Client::new();
        let resp = client
            .post(format!("{base_url}/v2/batch/bulk-job"))
            .json(&json!({
                "jobName": "dup",
                "items": [],
                "s3InputPath": "s3://bucket/in.ndjson",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn bulk_job_submits_and_converges_to_completed() {
        let base_url = spawn_test_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base_url}/v2/batch/bulk-job"))
            .json(&json!({
                "jobName": "batch-1",
                "items": [{"requestId": "1", "name": "Nicolas Maduro"}],
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 202);
        let submitted: Value = resp.json().await.unwrap();
        assert_eq!(submitted["status"], "SUBMITTED");
        let job_id = submitted["jobId"].as_str().unwrap().to_string();

        let mut status = json!({});
        for _ in 0..100 {
            let resp = client.get(format!("{base_url}/v2/batch/bulk-job/{job_id}?matches=true")).send().await.unwrap();
            status = resp.json().await.unwrap();
            if status["status"] == "COMPLETED" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(status["status"], "COMPLETED");
        assert_eq!(status["processedItems"], 1);
    }

    #[tokio::test]
    async fn unknown_job_id_returns_404() {
        let base_url = spawn_test_server().await;
        let resp = reqwest::get(format!("{base_url}/v2/batch/bulk-job/00000000-0000-0000-0000-000000000000")).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn admin_config_rejects_invalid_similarity_body() {
        let base_url = spawn_test_server().await;
        let client = reqwest::Client::new();
        let resp = client
            .put(format!("{base_url}/api/admin/config/similarity"))
            .json(&json!({
                "jaroWinklerPrefixSize": 99,
                "lengthDifferencePenaltyWeight": 0.3,
                "lengthDifferenceCutoffFactor": 0.9,
                "unmatchedIndexTokenWeight": 0.15,
                "phoneticFilteringDisabled": false,
                "keepStopwords": false,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().starts_with("Invalid configuration:"));
    }

    #[tokio::test]
    async fn admin_config_reset_restores_defaults() {
        let base_url = spawn_test_server().await;
        let client = reqwest::Client::new();
        client
            .put(format!("{base_url}/api/admin/config/weights"))
            .json(&json!({
                "nameWeight": 10.0,
                "addressWeight": 10.0,
                "criticalIdWeight": 10.0,
                "supportingInfoWeight": 10.0,
                "minMatch": 0.5,
                "exactMatchThreshold": 0.9,
            }))
            .send()
            .await
            .unwrap();

        let resp = client.post(format!("{base_url}/api/admin/config/reset")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["weights"]["minMatch"], sentinel_core::defaults::MIN_MATCH);
    }
}
