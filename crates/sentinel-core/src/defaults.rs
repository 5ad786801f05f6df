//! Centralized default constants for the sentinel screening engine.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// SCORING WEIGHTS
// =============================================================================

/// Weight for the effective (name vs alt-name, whichever is higher) name piece.
pub const NAME_WEIGHT: f64 = 35.0;

/// Weight for the address piece.
pub const ADDRESS_WEIGHT: f64 = 25.0;

/// Weight for government-id/crypto/contact pieces.
pub const CRITICAL_ID_WEIGHT: f64 = 50.0;

/// Weight for the date piece.
pub const SUPPORTING_INFO_WEIGHT: f64 = 15.0;

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Default result filter threshold.
pub const MIN_MATCH: f64 = 0.88;

/// Score at or above which a piece is considered an exact match.
pub const EXACT_MATCH_THRESHOLD: f64 = 0.99;

// =============================================================================
// SIMILARITY TUNABLES
// =============================================================================

/// Winkler prefix boost length.
pub const JARO_WINKLER_PREFIX_SIZE: usize = 4;

/// Multiplicative penalty weight applied for name length mismatch.
pub const LENGTH_DIFFERENCE_PENALTY_WEIGHT: f64 = 0.3;

/// Ratio below which the length-difference gate clamps a pair's contribution.
pub const LENGTH_DIFFERENCE_CUTOFF_FACTOR: f64 = 0.9;

/// Penalty applied per unmatched candidate token in token-set scoring.
pub const UNMATCHED_INDEX_TOKEN_WEIGHT: f64 = 0.15;

// =============================================================================
// COVERAGE PENALTY/BONUS THRESHOLDS
// =============================================================================

/// Below this overall coverage ratio, apply the 0.95 coverage penalty.
pub const COVERAGE_RATIO_PENALTY_THRESHOLD: f64 = 0.35;
pub const COVERAGE_RATIO_PENALTY_FACTOR: f64 = 0.95;

/// Below this critical-field coverage ratio, apply the 0.90 penalty.
pub const CRITICAL_COVERAGE_PENALTY_THRESHOLD: f64 = 0.70;
pub const CRITICAL_COVERAGE_PENALTY_FACTOR: f64 = 0.90;

/// Below this many compared required pieces, apply the 0.90 penalty.
pub const REQUIRED_PIECES_PENALTY_THRESHOLD: usize = 2;
pub const REQUIRED_PIECES_PENALTY_FACTOR: f64 = 0.90;

/// Name-only match (no ID, no address) penalty.
pub const NAME_ONLY_PENALTY_FACTOR: f64 = 0.95;

/// Minimum base score to be eligible for the high-confidence bonus.
pub const BONUS_BASE_THRESHOLD: f64 = 0.85;

/// Minimum coverage ratio to be eligible for the high-confidence bonus.
pub const BONUS_COVERAGE_RATIO_THRESHOLD: f64 = 0.7;

/// High-confidence bonus multiplier.
pub const BONUS_FACTOR: f64 = 1.15;

/// Score floor guaranteed by the exact-critical-identifier short-circuit.
pub const EXACT_ID_SHORT_CIRCUIT_FLOOR: f64 = 0.70;

// =============================================================================
// DATE COMPARISON
// =============================================================================

pub const DATE_YEAR_WEIGHT: f64 = 0.40;
pub const DATE_MONTH_WEIGHT: f64 = 0.30;
pub const DATE_DAY_WEIGHT: f64 = 0.30;

/// Years tolerated before the year component scores zero.
pub const DATE_YEAR_TOLERANCE: f64 = 5.0;

/// Logical-consistency penalty applied when a person's lifespan looks implausible.
pub const DATE_CONSISTENCY_PENALTY_FACTOR: f64 = 0.5;

/// Allowed lifespan variance for the birth/death consistency check.
pub const DATE_LIFESPAN_TOLERANCE_RATIO: f64 = 0.2;

// =============================================================================
// BULK JOB PROCESSING
// =============================================================================

/// Records per chunk when streaming a bulk job.
pub const BULK_JOB_CHUNK_SIZE: usize = 1000;

/// Default bounded parallelism within a chunk (spec §9: implementers should
/// bound it, e.g. 5-32 per job, and prefer a configurable value).
pub const BULK_JOB_CHUNK_CONCURRENCY: usize = 8;

/// Minimum allowed configurable chunk concurrency.
pub const BULK_JOB_CHUNK_CONCURRENCY_MIN: usize = 5;

/// Maximum allowed configurable chunk concurrency.
pub const BULK_JOB_CHUNK_CONCURRENCY_MAX: usize = 32;

/// Default search result limit for a single bulk-job item when the job did
/// not specify one.
pub const BULK_JOB_DEFAULT_LIMIT: usize = 10;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8084;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u32 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default search result limit when the caller does not specify one.
pub const SEARCH_DEFAULT_LIMIT: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_matches_spec_defaults() {
        const {
            assert!(NAME_WEIGHT as i64 == 35);
            assert!(ADDRESS_WEIGHT as i64 == 25);
            assert!(CRITICAL_ID_WEIGHT as i64 == 50);
            assert!(SUPPORTING_INFO_WEIGHT as i64 == 15);
        }
    }

    #[test]
    fn chunk_concurrency_default_within_guidance_range() {
        const {
            assert!(BULK_JOB_CHUNK_CONCURRENCY >= BULK_JOB_CHUNK_CONCURRENCY_MIN);
            assert!(BULK_JOB_CHUNK_CONCURRENCY <= BULK_JOB_CHUNK_CONCURRENCY_MAX);
        }
    }

    #[test]
    fn date_weights_sum_to_one() {
        let sum = DATE_YEAR_WEIGHT + DATE_MONTH_WEIGHT + DATE_DAY_WEIGHT;
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn min_match_and_exact_threshold_ordered() {
        const {
            assert!(MIN_MATCH < EXACT_MATCH_THRESHOLD);
        }
    }
}
