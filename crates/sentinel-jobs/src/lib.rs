//! # sentinel-jobs
//!
//! Bulk screening job orchestration: submit a batch of names (inline or as
//! an NDJSON object-store path), and poll for progress until it completes.
//!
//! This crate provides:
//! - NDJSON ingestion with malformed-line tolerance (`ndjson`)
//! - Per-job atomic progress state (`job_handle`)
//! - The chunked, bounded-concurrency worker that drives a job to completion
//!   (`worker`)
//! - The `BulkJobManager` entry point used by the API layer (`manager`)
//!
//! ## Example
//!
//! ```ignore
//! use sentinel_jobs::BulkJobManager;
//! use sentinel_core::{ConfigStore, InMemoryObjectStore};
//! use sentinel_screen::Index;
//! use std::sync::Arc;
//!
//! let manager = BulkJobManager::new(
//!     Arc::new(Index::new()),
//!     ConfigStore::default(),
//!     Arc::new(InMemoryObjectStore::new()),
//!     "mem://results",
//! );
//! let snapshot = manager.submit_job("batch-1".into(), vec![], 0.88, 10);
//! let status = manager.job_status(snapshot.job_id);
//! ```

pub mod job_handle;
pub mod manager;
pub mod ndjson;
pub mod worker;

pub use job_handle::JobHandle;
pub use manager::BulkJobManager;
pub use worker::JobParams;
