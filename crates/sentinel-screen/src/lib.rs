//! # sentinel-screen
//!
//! Normalization, similarity scoring, and in-memory search index for
//! sanctions/watchlist screening.
//!
//! This crate provides:
//! - Name folding, tokenization, phonetic encoding, and word-combination
//!   generation (`normalizer`)
//! - Jaro-Winkler similarity and token-set name comparison (`similarity`)
//! - Per-factor score pieces and the weighted aggregator (`scorer`)
//! - An atomically-swappable in-memory entity index (`index`)
//! - The search orchestration service and scoring trace capture
//!   (`search`, `trace`)
//!
//! ## Example
//!
//! ```ignore
//! use sentinel_screen::{Index, search};
//! use sentinel_core::{Entity, ScoringConfig};
//!
//! let index = Index::new();
//! index.replace_all(entities);
//!
//! let hits = search(&index, "Nicolas Maduro", None, None, 10, 0.88, false, &ScoringConfig::default());
//! ```

pub mod index;
pub mod normalizer;
pub mod scorer;
pub mod search;
pub mod similarity;
pub mod trace;

pub use index::Index;
pub use scorer::{aggregate, score, score_pieces};
pub use search::{search, SearchHit, SearchOutcome};
pub use similarity::{best_name_score, jaro_winkler, token_set_score, TokenSetOptions};
pub use trace::TraceContext;
