#[cfg(feature = "storage-local")]
use crate::LocalObjectStore;
#[cfg(feature = "storage-s3")]
use crate::{S3ClientParams, S3ObjectStore};
use crate::{ObjectStore, StorageError, StorageResult};
use std::sync::Arc;
use upmirror_core::{BackendKind, MirrorConfig};

/// Create the object-store backend described by configuration.
///
/// Returns `Ok(None)` when no bucket is configured: mirroring is off and the engine
/// passes every event through untouched.
pub async fn create_object_store(
    config: &MirrorConfig,
) -> StorageResult<Option<Arc<dyn ObjectStore>>> {
    #[cfg(feature = "storage-s3")]
    {
        create_object_store_with(config, |params| params).await
    }

    #[cfg(not(feature = "storage-s3"))]
    {
        build(config).await
    }
}

/// Same as [`create_object_store`], letting the caller rewrite the S3 client
/// parameters (region, credentials, endpoint, addressing style) before the client is built.
#[cfg(feature = "storage-s3")]
pub async fn create_object_store_with<F>(
    config: &MirrorConfig,
    filter_params: F,
) -> StorageResult<Option<Arc<dyn ObjectStore>>>
where
    F: FnOnce(S3ClientParams) -> S3ClientParams,
{
    if !config.is_enabled() {
        tracing::debug!("S3_UPLOADS_BUCKET not configured, mirroring disabled");
        return Ok(None);
    }

    match config.backend {
        BackendKind::S3 => {
            let params = filter_params(S3ClientParams::from_config(config));
            let store = S3ObjectStore::new(params).await?;
            Ok(Some(Arc::new(store)))
        }
        BackendKind::Local => build_local(config).await,
    }
}

#[cfg(not(feature = "storage-s3"))]
async fn build(config: &MirrorConfig) -> StorageResult<Option<Arc<dyn ObjectStore>>> {
    if !config.is_enabled() {
        return Ok(None);
    }

    match config.backend {
        BackendKind::S3 => Err(StorageError::ConfigError(
            "S3 mirror backend not available (storage-s3 feature not enabled)".to_string(),
        )),
        BackendKind::Local => build_local(config).await,
    }
}

#[cfg(feature = "storage-local")]
async fn build_local(config: &MirrorConfig) -> StorageResult<Option<Arc<dyn ObjectStore>>> {
    let root = config.local_root.clone().ok_or_else(|| {
        StorageError::ConfigError("MIRROR_LOCAL_ROOT not configured".to_string())
    })?;

    let store = LocalObjectStore::new(root).await?;
    Ok(Some(Arc::new(store)))
}

#[cfg(not(feature = "storage-local"))]
async fn build_local(_config: &MirrorConfig) -> StorageResult<Option<Arc<dyn ObjectStore>>> {
    Err(StorageError::ConfigError(
        "Local mirror backend not available (storage-local feature not enabled)".to_string(),
    ))
}
