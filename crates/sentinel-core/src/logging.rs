//! Structured logging field name constants for the sentinel screening engine.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), job transitions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-candidate scoring iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → job → sub-calls (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "screen", "jobs"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "normalizer", "scorer", "index", "bulk_job_manager"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "score", "submit_job", "claim_next_chunk"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Candidate/query entity UUID being operated on.
pub const ENTITY_ID: &str = "entity_id";

/// Bulk job UUID being processed.
pub const JOB_ID: &str = "job_id";

/// Free-text query name being screened.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search.
pub const RESULT_COUNT: &str = "result_count";

/// Size of the candidate pool before phonetic filtering.
pub const CANDIDATE_POOL_SIZE: &str = "candidate_pool_size";

/// Number of candidates culled by the phonetic pre-filter.
pub const PHONETIC_FILTERED: &str = "phonetic_filtered";

// ─── Bulk job fields ───────────────────────────────────────────────────────

/// Zero-based chunk index within a bulk job.
pub const CHUNK_INDEX: &str = "chunk_index";

/// Number of items in the current chunk.
pub const CHUNK_SIZE: &str = "chunk_size";

/// Running total of processed items for a job.
pub const PROCESSED_ITEMS: &str = "processed_items";

/// Running total of matched items for a job.
pub const MATCHED_ITEMS: &str = "matched_items";

/// Total items discovered for a job (may be unknown until stream exhausted).
pub const TOTAL_ITEMS: &str = "total_items";

/// Count of NDJSON lines skipped for being malformed.
pub const PARSE_ERROR_COUNT: &str = "parse_error_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
