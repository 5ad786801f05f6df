//! # sentinel-core
//!
//! Core types, traits, and abstractions for the sentinel screening engine.
//!
//! This crate provides the entity data model, scoring types, runtime config,
//! error type, and the narrow `ObjectStore` collaborator trait that
//! `sentinel-jobs` and `sentinel-api` build on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod object_store;
pub mod traits;

pub use config::{
    bulk_job_chunk_concurrency_from_env, ConfigStore, ScoringConfig, SimilarityConfig,
    WeightsConfig,
};
pub use error::{Error, Result};
pub use models::*;
pub use object_store::{has_object_store_scheme, InMemoryObjectStore, LocalFsObjectStore};
pub use traits::ObjectStore;
