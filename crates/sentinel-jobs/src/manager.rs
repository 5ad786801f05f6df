//! Public entry point for bulk screening jobs: `submitJob`, `submitJobFromS3`,
//! `getJobStatus`. Each submission spawns a detached worker task and returns
//! immediately with a `SUBMITTED` snapshot; job state lives in a concurrent
//! map keyed by job id so callers can poll without a round trip through the
//! worker itself.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use sentinel_core::{
    bulk_job_chunk_concurrency_from_env, has_object_store_scheme, BulkJobItem, BulkJobMatch, BulkJobStatusSnapshot,
    ConfigStore, Error, ObjectStore, Result,
};
use sentinel_screen::Index;
use uuid::Uuid;

use crate::job_handle::JobHandle;
use crate::worker::{self, JobParams};

/// Owns every in-flight and completed job's state for the lifetime of the
/// process. Cheap to clone: internally an `Arc` over the job map and the
/// collaborators each job needs.
#[derive(Clone)]
pub struct BulkJobManager {
    jobs: Arc<DashMap<Uuid, Arc<JobHandle>>>,
    index: Arc<Index>,
    config_store: ConfigStore,
    object_store: Arc<dyn ObjectStore>,
    results_root: String,
    chunk_concurrency: usize,
}

impl BulkJobManager {
    pub fn new(index: Arc<Index>, config_store: ConfigStore, object_store: Arc<dyn ObjectStore>, results_root: impl Into<String>) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            index,
            config_store,
            object_store,
            results_root: results_root.into(),
            chunk_concurrency: bulk_job_chunk_concurrency_from_env(),
        }
    }

    /// Submits a job whose items are supplied inline. Non-blocking: the job
    /// is handed to a spawned task and this returns the `SUBMITTED` snapshot.
    pub fn submit_job(&self, job_name: String, items: Vec<BulkJobItem>, min_match: f64, limit: usize) -> BulkJobStatusSnapshot {
        let job_id = Uuid::new_v4();
        let handle = Arc::new(JobHandle::new(job_id, job_name, items.len() as u64, Utc::now()));
        self.jobs.insert(job_id, handle.clone());

        let params = self.job_params(min_match, limit);
        tokio::spawn(worker::run_from_items(handle.clone(), items, params));

        handle.snapshot()
    }

    /// Submits a job whose items are streamed NDJSON from `s3_input_path`.
    /// `totalItems` is unknown until the stream is drained, so the returned
    /// snapshot reports it as `0`; `getJobStatus` reflects the real count
    /// once the worker has read the object.
    pub fn submit_job_from_s3(&self, job_name: String, s3_input_path: String, min_match: f64, limit: usize) -> Result<BulkJobStatusSnapshot> {
        if !has_object_store_scheme(&s3_input_path) {
            return Err(Error::InvalidInput(format!(
                "s3InputPath must use a recognized object-store scheme: {s3_input_path}"
            )));
        }

        let job_id = Uuid::new_v4();
        let handle = Arc::new(JobHandle::new(job_id, job_name, 0, Utc::now()));
        self.jobs.insert(job_id, handle.clone());

        let params = self.job_params(min_match, limit);
        tokio::spawn(worker::run_from_object_store(handle.clone(), s3_input_path, params));

        Ok(handle.snapshot())
    }

    pub fn job_status(&self, job_id: Uuid) -> Option<BulkJobStatusSnapshot> {
        self.jobs.get(&job_id).map(|entry| entry.snapshot())
    }

    /// Matches accumulated so far, available for failed jobs too (spec: a
    /// failed job ends with partial state visible via `getJobStatus`).
    pub fn job_matches(&self, job_id: Uuid) -> Option<Vec<BulkJobMatch>> {
        self.jobs.get(&job_id).map(|entry| entry.matches_snapshot())
    }

    fn job_params(&self, min_match: f64, limit: usize) -> JobParams {
        JobParams {
            index: self.index.clone(),
            config_store: self.config_store.clone(),
            object_store: self.object_store.clone(),
            results_root: self.results_root.clone(),
            min_match,
            limit,
            chunk_concurrency: self.chunk_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::{defaults, Entity, EntitySource, EntityType, InMemoryObjectStore};

    fn manager() -> BulkJobManager {
        let index = Arc::new(Index::new());
        let mut maduro = Entity::from_query_name("Nicolas Maduro");
        maduro.source = Some(EntitySource::OfacSdn);
        maduro.entity_type = EntityType::Person;
        maduro.id = Uuid::new_v4();
        index.replace_all(vec![maduro], false);

        BulkJobManager::new(
            index,
            ConfigStore::default(),
            Arc::new(InMemoryObjectStore::new()),
            "mem://results",
        )
    }

    fn item(request_id: &str, name: &str) -> BulkJobItem {
        BulkJobItem { request_id: request_id.to_string(), name: name.to_string(), entity_type: None, source: None }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn submit_job_reports_submitted_then_converges_to_completed() {
        let manager = manager();
        let snapshot = manager.submit_job(
            "job-1".to_string(),
            vec![item("1", "Nicolas Maduro")],
            defaults::MIN_MATCH,
            defaults::BULK_JOB_DEFAULT_LIMIT,
        );
        assert_eq!(snapshot.total_items, 1);

        for _ in 0..200 {
            if manager.job_status(snapshot.job_id).unwrap().status == sentinel_core::BulkJobStatus::Completed {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let final_status = manager.job_status(snapshot.job_id).unwrap();
        assert_eq!(final_status.status, sentinel_core::BulkJobStatus::Completed);
        assert_eq!(final_status.matched_items, 1);
        assert_eq!(manager.job_matches(snapshot.job_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn submit_job_from_s3_rejects_unrecognized_scheme() {
        let manager = manager();
        let result = manager.submit_job_from_s3("job".to_string(), "https://example.com/in.ndjson".to_string(), defaults::MIN_MATCH, 10);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn job_status_is_none_for_unknown_job() {
        let manager = manager();
        assert!(manager.job_status(Uuid::new_v4()).is_none());
    }
}
