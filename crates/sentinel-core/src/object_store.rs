//! Concrete `ObjectStore` implementations: local filesystem and in-memory.
//!
//! A production S3-backed client is explicitly out of scope; callers supply
//! their own `Arc<dyn ObjectStore>` for that.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{Error, Result};
use crate::traits::ObjectStore;

/// Maps `scheme://bucket/key` URIs onto files under a configured local root,
/// for the reference deployment and for integration tests.
pub struct LocalFsObjectStore {
    root: PathBuf,
}

impl LocalFsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        let relative = strip_scheme(uri);
        self.root.join(relative)
    }
}

fn strip_scheme(uri: &str) -> &str {
    match uri.find("://") {
        Some(idx) => &uri[idx + 3..],
        None => uri,
    }
}

#[async_trait]
impl ObjectStore for LocalFsObjectStore {
    async fn get_lines(&self, uri: &str) -> Result<BoxStream<'static, std::io::Result<String>>> {
        let path = self.resolve(uri);
        let file = tokio::fs::File::open(&path).await?;
        let reader = BufReader::new(file);
        let lines = tokio_stream::wrappers::LinesStream::new(reader.lines());
        Ok(lines.boxed())
    }

    async fn put_json(&self, uri: &str, bytes: Vec<u8>) -> Result<()> {
        let path = self.resolve(uri);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}

/// In-memory object store for unit and integration tests: no filesystem
/// access, fully deterministic.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, uri: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.objects.lock().unwrap().insert(uri.into(), contents.into());
    }

    pub fn get(&self, uri: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(uri).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_lines(&self, uri: &str) -> Result<BoxStream<'static, std::io::Result<String>>> {
        let bytes = self
            .objects
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .ok_or_else(|| Error::StorageUnavailable(format!("no such object: {uri}")))?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let lines: Vec<std::io::Result<String>> =
            text.lines().map(|l| Ok(l.to_string())).collect();
        Ok(stream::iter(lines).boxed())
    }

    async fn put_json(&self, uri: &str, bytes: Vec<u8>) -> Result<()> {
        self.objects.lock().unwrap().insert(uri.to_string(), bytes);
        Ok(())
    }
}

/// True if `path` looks like an object-store URI this bulk-job manager
/// accepts (spec §5.5: `submitJobFromS3` validates the scheme).
pub fn has_object_store_scheme(path: &str) -> bool {
    path.starts_with("s3://") || path.starts_with("file://") || path.starts_with("mem://")
}
