//! Drives one bulk screening job from `SUBMITTED` to a terminal status,
//! chunking the input and bounding per-chunk concurrency the way the
//! screening engine's worker pool does for every other batch of background
//! work: claim a bounded number of concurrent tasks, wait for the batch,
//! move on to the next.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use sentinel_core::{
    defaults, BulkJobItem, BulkJobMatch, BulkJobStatus, BulkJobSummary, ConfigStore, ObjectStore,
};
use sentinel_screen::Index;
use tracing::{debug, error, info, warn};

use crate::job_handle::JobHandle;
use crate::ndjson;

/// Parameters shared by every chunk of a single job; cloned cheaply per chunk.
#[derive(Clone)]
pub struct JobParams {
    pub index: Arc<Index>,
    pub config_store: ConfigStore,
    pub object_store: Arc<dyn ObjectStore>,
    pub results_root: String,
    pub min_match: f64,
    pub limit: usize,
    pub chunk_concurrency: usize,
}

/// Runs a job whose items were supplied inline at submission time.
pub async fn run_from_items(handle: Arc<JobHandle>, items: Vec<BulkJobItem>, params: JobParams) {
    handle.set_status(BulkJobStatus::Running);
    info!(job_id = %handle.job_id, total_items = items.len(), "bulk job started");
    run_chunks(&handle, items, &params).await;
    finalize(&handle, &params).await;
}

/// Runs a job whose items are streamed NDJSON from an object store.
pub async fn run_from_object_store(handle: Arc<JobHandle>, source_uri: String, params: JobParams) {
    handle.set_status(BulkJobStatus::Running);
    info!(job_id = %handle.job_id, source_uri, "bulk job started from object store");

    let lines = match params.object_store.get_lines(&source_uri).await {
        Ok(lines) => lines,
        Err(e) => {
            error!(job_id = %handle.job_id, error = %e, "failed to open bulk job input");
            handle.fail(e.to_string());
            return;
        }
    };

    let parsed = match ndjson::parse_ndjson_lines(lines).await {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(job_id = %handle.job_id, error = %e, "failed to read bulk job input stream");
            handle.fail(e.to_string());
            return;
        }
    };

    if parsed.parse_error_count > 0 {
        warn!(
            job_id = %handle.job_id,
            parse_error_count = parsed.parse_error_count,
            "skipped malformed NDJSON lines"
        );
    }

    handle.set_total_items(parsed.items.len() as u64);
    run_chunks(&handle, parsed.items, &params).await;
    finalize(&handle, &params).await;
}

async fn run_chunks(handle: &Arc<JobHandle>, items: Vec<BulkJobItem>, params: &JobParams) {
    for (chunk_index, chunk) in items.chunks(defaults::BULK_JOB_CHUNK_SIZE).enumerate() {
        let outcomes = score_chunk(chunk, params).await;

        let mut matched_count = 0u64;
        let mut chunk_matches = Vec::new();
        for (item, outcome) in outcomes {
            if outcome.entities.is_empty() {
                continue;
            }
            matched_count += 1;
            for hit in outcome.entities {
                chunk_matches.push(BulkJobMatch {
                    customer_id: item.request_id.clone(),
                    name: item.name.clone(),
                    entity_id: hit.entity_id.to_string(),
                    match_score: hit.score,
                    source: hit.source,
                });
            }
        }

        handle.record_chunk(chunk.len() as u64, matched_count, chunk_matches);
        debug!(
            job_id = %handle.job_id,
            chunk_index,
            chunk_size = chunk.len(),
            processed_items = handle.processed_items(),
            "chunk complete"
        );
    }
}

/// Scores every item in a chunk, preserving input order while bounding how
/// many searches run concurrently. `buffered` runs up to `chunk_concurrency`
/// futures at once and yields results in submission order, so the chunk's
/// contribution to `matches.json` stays deterministic without an explicit
/// reassembly step.
async fn score_chunk(
    chunk: &[BulkJobItem],
    params: &JobParams,
) -> Vec<(BulkJobItem, sentinel_screen::SearchOutcome)> {
    let config = *params.config_store.load();
    let min_match = params.min_match;
    let limit = params.limit;

    stream::iter(chunk.to_vec().into_iter().map(|item| {
        let index = params.index.clone();
        async move {
            let name = item.name.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                sentinel_screen::search(
                    &index,
                    &name,
                    item.source,
                    item.entity_type,
                    limit,
                    min_match,
                    false,
                    &config,
                )
            })
            .await
            .expect("screening task panicked");
            (item, outcome)
        }
    }))
    .buffered(params.chunk_concurrency.max(1))
    .collect()
    .await
}

async fn finalize(handle: &Arc<JobHandle>, params: &JobParams) {
    let matches = handle.matches_snapshot();
    let snapshot = handle.snapshot();
    let completed_at = chrono::Utc::now();

    let summary = BulkJobSummary {
        job_id: handle.job_id,
        status: BulkJobStatus::Completed,
        total_items: snapshot.total_items,
        processed_items: snapshot.processed_items,
        matched_items: snapshot.matched_items,
        submitted_at: snapshot.submitted_at,
        completed_at,
        duration_ms: (completed_at - snapshot.submitted_at).num_milliseconds(),
        result_path: format!("{}/{}", params.results_root, handle.job_id),
    };

    let matches_uri = format!("{}/{}/matches.json", params.results_root, handle.job_id);
    let summary_uri = format!("{}/{}/summary.json", params.results_root, handle.job_id);

    if let Err(e) = write_json(params, &matches_uri, &matches).await {
        error!(job_id = %handle.job_id, error = %e, "failed to write matches.json");
        handle.fail(e.to_string());
        return;
    }
    if let Err(e) = write_json(params, &summary_uri, &summary).await {
        error!(job_id = %handle.job_id, error = %e, "failed to write summary.json");
        handle.fail(e.to_string());
        return;
    }

    info!(
        job_id = %handle.job_id,
        processed_items = snapshot.processed_items,
        matched_items = snapshot.matched_items,
        "bulk job completed"
    );
    handle.complete(format!("{}/{}", params.results_root, handle.job_id));
}

async fn write_json<T: serde::Serialize>(params: &JobParams, uri: &str, value: &T) -> sentinel_core::Result<()> {
    let bytes = serde_json::to_vec(value)?;
    params.object_store.put_json(uri, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::{Entity, EntitySource, EntityType, InMemoryObjectStore};

    fn params_with_seeded_index(object_store: InMemoryObjectStore) -> JobParams {
        let index = Arc::new(Index::new());
        let mut maduro = Entity::from_query_name("Nicolas Maduro");
        maduro.source = Some(EntitySource::OfacSdn);
        maduro.entity_type = EntityType::Person;
        maduro.id = uuid::Uuid::new_v4();
        index.replace_all(vec![maduro], false);

        JobParams {
            index,
            config_store: ConfigStore::default(),
            object_store: Arc::new(object_store),
            results_root: "mem://results".to_string(),
            min_match: defaults::MIN_MATCH,
            limit: defaults::BULK_JOB_DEFAULT_LIMIT,
            chunk_concurrency: 2,
        }
    }

    fn item(request_id: &str, name: &str) -> BulkJobItem {
        BulkJobItem { request_id: request_id.to_string(), name: name.to_string(), entity_type: None, source: None }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_from_items_completes_and_records_matches() {
        let params = params_with_seeded_index(InMemoryObjectStore::new());
        let handle = Arc::new(JobHandle::new(uuid::Uuid::new_v4(), "job".to_string(), 2, chrono::Utc::now()));
        let items = vec![item("1", "Nicolas Maduro"), item("2", "Someone Else Entirely")];

        run_from_items(handle.clone(), items, params).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.status, BulkJobStatus::Completed);
        assert_eq!(snapshot.processed_items, 2);
        assert_eq!(snapshot.matched_items, 1);
        assert!(snapshot.result_path.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_from_object_store_fails_cleanly_on_missing_input() {
        let params = params_with_seeded_index(InMemoryObjectStore::new());
        let handle = Arc::new(JobHandle::new(uuid::Uuid::new_v4(), "job".to_string(), 0, chrono::Utc::now()));

        run_from_object_store(handle.clone(), "mem://bucket/missing.ndjson".to_string(), params).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.status, BulkJobStatus::Failed);
        assert!(snapshot.error_message.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_from_object_store_parses_and_scores_ndjson() {
        let object_store = InMemoryObjectStore::new();
        object_store.seed(
            "mem://bucket/in.ndjson",
            "{\"requestId\":\"1\",\"name\":\"Nicolas Maduro\"}\n\n{\"requestId\":\"2\",\"name\":\"Someone Else\"}\n",
        );
        let params = params_with_seeded_index(object_store);
        let handle = Arc::new(JobHandle::new(uuid::Uuid::new_v4(), "job".to_string(), 0, chrono::Utc::now()));

        run_from_object_store(handle.clone(), "mem://bucket/in.ndjson".to_string(), params).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.status, BulkJobStatus::Completed);
        assert_eq!(snapshot.total_items, 2);
        assert_eq!(snapshot.matched_items, 1);
    }
}
