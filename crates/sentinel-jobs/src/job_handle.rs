//! In-memory state for one bulk job: atomic counters plus a small set of
//! fields that change at most once (status, completion time, result path,
//! error). Readers (`getJobStatus`) and the single writer (the worker task
//! driving this job) never block each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use sentinel_core::{BulkJobMatch, BulkJobStatus, BulkJobStatusSnapshot};
use uuid::Uuid;

pub struct JobHandle {
    pub job_id: Uuid,
    pub job_name: String,
    pub submitted_at: DateTime<Utc>,
    started_at: Instant,
    status: RwLock<BulkJobStatus>,
    total_items: AtomicU64,
    processed_items: AtomicU64,
    matched_items: AtomicU64,
    completed_at: RwLock<Option<DateTime<Utc>>>,
    result_path: RwLock<Option<String>>,
    error_message: RwLock<Option<String>>,
    matches: Mutex<Vec<BulkJobMatch>>,
}

impl JobHandle {
    pub fn new(job_id: Uuid, job_name: String, total_items: u64, submitted_at: DateTime<Utc>) -> Self {
        Self {
            job_id,
            job_name,
            submitted_at,
            started_at: Instant::now(),
            status: RwLock::new(BulkJobStatus::Submitted),
            total_items: AtomicU64::new(total_items),
            processed_items: AtomicU64::new(0),
            matched_items: AtomicU64::new(0),
            completed_at: RwLock::new(None),
            result_path: RwLock::new(None),
            error_message: RwLock::new(None),
            matches: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, status: BulkJobStatus) {
        *self.status.write().unwrap() = status;
    }

    pub fn set_total_items(&self, n: u64) {
        self.total_items.store(n, Ordering::SeqCst);
    }

    pub fn processed_items(&self) -> u64 {
        self.processed_items.load(Ordering::SeqCst)
    }

    pub fn total_items(&self) -> u64 {
        self.total_items.load(Ordering::SeqCst)
    }

    pub fn record_chunk(&self, processed: u64, matched: u64, new_matches: Vec<BulkJobMatch>) {
        self.processed_items.fetch_add(processed, Ordering::SeqCst);
        self.matched_items.fetch_add(matched, Ordering::SeqCst);
        self.matches.lock().unwrap().extend(new_matches);
    }

    pub fn matches_snapshot(&self) -> Vec<BulkJobMatch> {
        self.matches.lock().unwrap().clone()
    }

    pub fn complete(&self, result_path: String) {
        *self.result_path.write().unwrap() = Some(result_path);
        *self.completed_at.write().unwrap() = Some(Utc::now());
        self.set_status(BulkJobStatus::Completed);
    }

    pub fn fail(&self, message: String) {
        *self.error_message.write().unwrap() = Some(message);
        *self.completed_at.write().unwrap() = Some(Utc::now());
        self.set_status(BulkJobStatus::Failed);
    }

    pub fn snapshot(&self) -> BulkJobStatusSnapshot {
        let total = self.total_items();
        let processed = self.processed_items();
        let matched = self.matched_items.load(Ordering::SeqCst);
        let percent_complete = if total == 0 { 0 } else { ((processed as f64 / total as f64) * 100.0).floor() as u32 };

        BulkJobStatusSnapshot {
            job_id: self.job_id,
            job_name: self.job_name.clone(),
            status: *self.status.read().unwrap(),
            total_items: total,
            processed_items: processed,
            matched_items: matched,
            percent_complete,
            estimated_time_remaining_secs: self.estimate_remaining_secs(processed, total),
            submitted_at: self.submitted_at,
            completed_at: *self.completed_at.read().unwrap(),
            result_path: self.result_path.read().unwrap().clone(),
            error_message: self.error_message.read().unwrap().clone(),
        }
    }

    fn estimate_remaining_secs(&self, processed: u64, total: u64) -> Option<u64> {
        if processed == 0 || total == 0 || processed >= total {
            return None;
        }
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }
        let throughput = processed as f64 / elapsed;
        if throughput <= 0.0 {
            return None;
        }
        Some(((total - processed) as f64 / throughput).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_submitted_status_with_zero_progress() {
        let handle = JobHandle::new(Uuid::new_v4(), "job".to_string(), 10, Utc::now());
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.status, BulkJobStatus::Submitted);
        assert_eq!(snapshot.total_items, 10);
        assert_eq!(snapshot.processed_items, 0);
        assert_eq!(snapshot.percent_complete, 0);
    }

    #[test]
    fn record_chunk_accumulates_counters_and_matches() {
        let handle = JobHandle::new(Uuid::new_v4(), "job".to_string(), 4, Utc::now());
        handle.record_chunk(2, 1, vec![]);
        handle.record_chunk(2, 0, vec![]);
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.processed_items, 4);
        assert_eq!(snapshot.matched_items, 1);
        assert_eq!(snapshot.percent_complete, 100);
    }

    #[test]
    fn complete_sets_terminal_status_once() {
        let handle = JobHandle::new(Uuid::new_v4(), "job".to_string(), 1, Utc::now());
        handle.set_status(BulkJobStatus::Running);
        handle.complete("mem://results/x".to_string());
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.status, BulkJobStatus::Completed);
        assert_eq!(snapshot.result_path.as_deref(), Some("mem://results/x"));
        assert!(snapshot.completed_at.is_some());
    }

    #[test]
    fn fail_records_error_message() {
        let handle = JobHandle::new(Uuid::new_v4(), "job".to_string(), 1, Utc::now());
        handle.fail("storage unavailable".to_string());
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.status, BulkJobStatus::Failed);
        assert_eq!(snapshot.error_message.as_deref(), Some("storage unavailable"));
    }
}
