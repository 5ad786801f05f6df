//! Shared application state handed to every handler.

use std::sync::Arc;

use governor::{Quota, RateLimiter};
use sentinel_core::{ConfigStore, ObjectStore};
use sentinel_jobs::BulkJobManager;
use sentinel_screen::Index;

/// Direct (not per-key) rate limiter: every request draws from one shared quota.
pub type GlobalRateLimiter = RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<Index>,
    pub config_store: ConfigStore,
    pub jobs: BulkJobManager,
    pub object_store: Arc<dyn ObjectStore>,
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

pub fn rate_limiter_from_env() -> Option<Arc<GlobalRateLimiter>> {
    let enabled = std::env::var("RATE_LIMIT_ENABLED").map(|v| v.eq_ignore_ascii_case("true") || v == "1").unwrap_or(true);
    if !enabled {
        return None;
    }

    let requests: u32 = std::env::var("RATE_LIMIT_REQUESTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(sentinel_core::defaults::RATE_LIMIT_REQUESTS);
    let period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(sentinel_core::defaults::RATE_LIMIT_PERIOD_SECS);

    let quota = Quota::with_period(std::time::Duration::from_secs(period_secs))
        .expect("rate limit period must be non-zero")
        .allow_burst(std::num::NonZeroU32::new(requests).expect("rate limit must be non-zero"));

    Some(Arc::new(RateLimiter::direct(quota)))
}
