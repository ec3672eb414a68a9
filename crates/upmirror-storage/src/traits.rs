//! Object-store abstraction trait
//!
//! This module defines the `ObjectStore` trait that every mirror backend implements.

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use thiserror::Error;
use upmirror_core::{BackendKind, ObjectAcl};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub acl: ObjectAcl,
    pub content_type: Option<String>,
}

/// Object-store capability used by the mirror engine.
///
/// Implementations must be safe to call from many in-flight requests at once; the
/// engine submits a whole batch of puts together and relies on the client's own
/// connection pooling to bound concurrency.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object.
    async fn put(&self, request: PutObject) -> StorageResult<()>;

    /// Remove one object. Removing an object that does not exist is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Submit several puts together and wait for all of them to settle.
    ///
    /// One result per request, in request order. A failed put never cancels its siblings.
    async fn put_batch(&self, requests: Vec<PutObject>) -> Vec<StorageResult<()>> {
        join_all(requests.into_iter().map(|request| self.put(request))).await
    }

    /// Get the backend type
    fn backend_type(&self) -> BackendKind;
}
