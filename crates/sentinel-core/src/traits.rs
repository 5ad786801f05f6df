//! Narrow external-collaborator traits for the screening engine.
//!
//! Spec places the object-store transport out of scope; this crate defines
//! only the boundary the bulk-job manager programs against.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

/// Minimal object-store contract: stream lines from an NDJSON object, write
/// a JSON blob back. A production S3 client is a caller-supplied
/// `Arc<dyn ObjectStore>`; this crate ships only in-memory and local-disk
/// implementations for tests and the reference deployment.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Streams an object's contents line by line. Each item is `Ok(line)`
    /// for a successfully read line or `Err` if the underlying I/O fails
    /// mid-stream; it is NOT used for per-line JSON parse failures, which
    /// the caller handles itself.
    async fn get_lines(&self, uri: &str) -> Result<BoxStream<'static, std::io::Result<String>>>;

    /// Writes `bytes` to `uri`, creating or overwriting it.
    async fn put_json(&self, uri: &str, bytes: Vec<u8>) -> Result<()>;
}
