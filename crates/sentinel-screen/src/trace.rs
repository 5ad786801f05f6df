//! Zero-overhead-when-disabled scoring trace capture.
//!
//! The search service accepts a `TraceContext` that is either `Disabled` (a
//! cheap unit-like constant, no per-call allocation) or `Enabled`, which
//! accumulates per-candidate `ScoringTraceEvent`s and phase timings into a
//! `ScoringTrace` that is attached to the search response.

use std::collections::BTreeMap;
use std::time::Instant;

use sentinel_core::{ScorePiece, ScoringTrace, ScoringTraceEvent};
use uuid::Uuid;

/// Trace context threaded through a single search call.
pub enum TraceContext {
    Disabled,
    Enabled(EnabledTrace),
}

impl TraceContext {
    pub const DISABLED: TraceContext = TraceContext::Disabled;

    pub fn enabled() -> Self {
        TraceContext::Enabled(EnabledTrace::default())
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, TraceContext::Enabled(_))
    }

    /// Records one candidate's scoring pieces and phase timings. No-op when
    /// the context is disabled.
    pub fn record_candidate(
        &mut self,
        entity_id: Uuid,
        pieces: Vec<ScorePiece>,
        phase_timings_us: BTreeMap<String, u64>,
    ) {
        if let TraceContext::Enabled(trace) = self {
            trace.events.push(ScoringTraceEvent {
                entity_id,
                pieces,
                phase_timings_us,
            });
        }
    }

    pub fn set_pool_metadata(&mut self, candidate_pool_size: usize, phonetic_filtered: usize) {
        if let TraceContext::Enabled(trace) = self {
            trace.candidate_pool_size = candidate_pool_size;
            trace.phonetic_filtered = phonetic_filtered;
        }
    }

    /// Consumes the context, returning `Some(ScoringTrace)` if it was enabled.
    pub fn into_trace(self) -> Option<ScoringTrace> {
        match self {
            TraceContext::Disabled => None,
            TraceContext::Enabled(trace) => Some(ScoringTrace {
                events: trace.events,
                candidate_pool_size: trace.candidate_pool_size,
                phonetic_filtered: trace.phonetic_filtered,
            }),
        }
    }
}

#[derive(Default)]
pub struct EnabledTrace {
    events: Vec<ScoringTraceEvent>,
    candidate_pool_size: usize,
    phonetic_filtered: usize,
}

/// Measures a phase's wall-clock duration, recording it only when `trace`
/// is enabled; otherwise the `Instant::now()` call is the only overhead.
pub fn timed_phase<T>(trace: &TraceContext, timings: &mut BTreeMap<String, u64>, name: &str, f: impl FnOnce() -> T) -> T {
    if !trace.is_enabled() {
        return f();
    }
    let start = Instant::now();
    let result = f();
    timings.insert(name.to_string(), start.elapsed().as_micros() as u64);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_context_into_trace_is_none() {
        assert!(TraceContext::Disabled.into_trace().is_none());
    }

    #[test]
    fn enabled_context_accumulates_events() {
        let mut ctx = TraceContext::enabled();
        ctx.record_candidate(Uuid::nil(), vec![], BTreeMap::new());
        ctx.set_pool_metadata(5, 2);
        let trace = ctx.into_trace().unwrap();
        assert_eq!(trace.events.len(), 1);
        assert_eq!(trace.candidate_pool_size, 5);
        assert_eq!(trace.phonetic_filtered, 2);
    }

    #[test]
    fn timed_phase_skips_timing_when_disabled() {
        let trace = TraceContext::Disabled;
        let mut timings = BTreeMap::new();
        let result = timed_phase(&trace, &mut timings, "score", || 42);
        assert_eq!(result, 42);
        assert!(timings.is_empty());
    }

    #[test]
    fn timed_phase_records_timing_when_enabled() {
        let trace = TraceContext::enabled();
        let mut timings = BTreeMap::new();
        timed_phase(&trace, &mut timings, "score", || ());
        assert!(timings.contains_key("score"));
    }
}
