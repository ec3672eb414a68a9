use crate::traits::{ObjectStore, PutObject, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use upmirror_core::BackendKind;

/// Local directory object-store implementation
///
/// Objects land at `{root}/{bucket}/{key}`. ACLs and content types are accepted and
/// ignored.
#[derive(Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new LocalObjectStore instance
    ///
    /// # Arguments
    /// * `root` - Directory that stands in for the object store (e.g., "/var/lib/upmirror")
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create mirror directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalObjectStore { root })
    }

    /// Convert bucket and key to a filesystem path, refusing anything that could
    /// escape the mirror root.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        for (what, value) in [("bucket", bucket), ("key", key)] {
            if value.is_empty()
                || value.starts_with('/')
                || value.split('/').any(|segment| segment == "..")
                || value.contains('\\')
            {
                return Err(StorageError::InvalidKey(format!(
                    "{} '{}' contains invalid characters",
                    what, value
                )));
            }
        }
        if bucket.contains('/') {
            return Err(StorageError::InvalidKey(format!(
                "bucket '{}' must not contain '/'",
                bucket
            )));
        }

        Ok(self.root.join(bucket).join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, request: PutObject) -> StorageResult<()> {
        let path = self.object_path(&request.bucket, &request.key)?;
        let size = request.body.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&request.body).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %request.bucket,
            key = %request.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local mirror upload successful"
        );

        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local mirror delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> BackendKind {
        BackendKind::Local
    }
}
