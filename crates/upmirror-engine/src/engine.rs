//! The mirror engine: batch uploads on asset creation, single deletes on file removal.

use bytes::Bytes;
use futures::future::join_all;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::sync::Arc;
use upmirror_core::constants::{DELETE_FAILURE_MESSAGE, UPLOAD_FAILURE_MESSAGE};
use upmirror_core::{
    enumerate_files, resolve_delete_target, AssetMetadata, BucketTarget, MirrorConfig, MirrorFile,
    ObjectAcl, UploadRoot,
};
use upmirror_storage::{ObjectStore, PutObject, StorageError};

use crate::result::MirrorResult;

/// Phases of one asset-created operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorPhase {
    Idle,
    Resolving,
    Uploading,
    Done,
}

impl Display for MirrorPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MirrorPhase::Idle => write!(f, "idle"),
            MirrorPhase::Resolving => write!(f, "resolving"),
            MirrorPhase::Uploading => write!(f, "uploading"),
            MirrorPhase::Done => write!(f, "done"),
        }
    }
}

struct Remote {
    store: Arc<dyn ObjectStore>,
    target: BucketTarget,
}

/// Mirrors the uploads tree into an object store.
///
/// Holds no host reference and no mutable state: concurrent calls for different
/// assets share only the store handle. Without a store or a bucket target every
/// operation is a no-op returning an empty [`MirrorResult`].
pub struct MirrorEngine {
    upload_root: UploadRoot,
    remote: Option<Remote>,
    acl: ObjectAcl,
}

impl MirrorEngine {
    pub fn new(
        upload_root: UploadRoot,
        store: Option<Arc<dyn ObjectStore>>,
        target: Option<BucketTarget>,
    ) -> Self {
        let remote = match (store, target) {
            (Some(store), Some(target)) => Some(Remote { store, target }),
            _ => None,
        };

        Self {
            upload_root,
            remote,
            acl: ObjectAcl::default(),
        }
    }

    /// Build an engine from configuration and an already-created store.
    pub fn from_config(config: &MirrorConfig, store: Option<Arc<dyn ObjectStore>>) -> Self {
        Self::new(config.upload_root(), store, config.bucket_target())
            .with_acl(config.object_acl.clone())
    }

    pub fn with_acl(mut self, acl: ObjectAcl) -> Self {
        self.acl = acl;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn upload_root(&self) -> &UploadRoot {
        &self.upload_root
    }

    pub fn bucket_target(&self) -> Option<&BucketTarget> {
        self.remote.as_ref().map(|remote| &remote.target)
    }

    /// Upload the primary file and every size variant of a newly generated asset.
    ///
    /// All puts go out as one batch and the call returns once every one has settled.
    /// A failed file never stops its siblings; failures are logged as a single entry
    /// and returned in the result.
    #[tracing::instrument(skip_all, fields(file = ?metadata.primary_relative_path))]
    pub async fn on_asset_created(&self, metadata: &AssetMetadata) -> MirrorResult {
        let Some(remote) = &self.remote else {
            return MirrorResult::empty();
        };

        tracing::debug!(phase = %MirrorPhase::Resolving, "Resolving asset files");
        let files = match enumerate_files(&self.upload_root, &remote.target, metadata) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    file = ?metadata.primary_relative_path,
                    "Rejected asset metadata, nothing mirrored"
                );
                return MirrorResult::empty();
            }
        };

        if files.is_empty() {
            tracing::debug!(phase = %MirrorPhase::Done, "No files to mirror");
            return MirrorResult::empty();
        }

        tracing::debug!(
            phase = %MirrorPhase::Uploading,
            file_count = files.len(),
            "Uploading asset files"
        );
        let start = std::time::Instant::now();
        let outcomes = self.upload_batch(remote, &files).await;

        let mut result = MirrorResult::empty();
        for (file, outcome) in files.iter().cloned().zip(outcomes) {
            match outcome {
                Ok(()) => result.record_success(file),
                Err(e) => result.record_failure(file, e.to_string()),
            }
        }

        if result.has_failures() {
            let attempted: Vec<String> = files
                .iter()
                .map(|file| file.absolute_local_path.display().to_string())
                .collect();
            tracing::error!(
                error = %result.failure_summary(),
                files = ?attempted,
                bucket = %remote.target.bucket,
                succeeded = result.succeeded.len(),
                failed = result.failed.len(),
                "{}",
                UPLOAD_FAILURE_MESSAGE
            );
        } else {
            tracing::info!(
                bucket = %remote.target.bucket,
                file_count = result.succeeded.len(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Mirrored asset files"
            );
        }

        tracing::debug!(phase = %MirrorPhase::Done, "Asset mirror finished");
        result
    }

    /// Remove the remote copy of a local file that is being deleted.
    ///
    /// Paths outside the uploads root are ignored. A failed delete is logged and
    /// reported in the result, never raised.
    #[tracing::instrument(skip_all, fields(file = %absolute_local_path.display()))]
    pub async fn on_asset_deleted(&self, absolute_local_path: &Path) -> MirrorResult {
        let Some(remote) = &self.remote else {
            return MirrorResult::empty();
        };

        let Some(file) =
            resolve_delete_target(&self.upload_root, &remote.target, absolute_local_path)
        else {
            tracing::debug!("File is outside the uploads root, nothing to delete remotely");
            return MirrorResult::empty();
        };

        let mut result = MirrorResult::empty();
        match remote
            .store
            .delete(&remote.target.bucket, &file.remote_key)
            .await
        {
            Ok(()) => result.record_success(file),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    file = %absolute_local_path.display(),
                    bucket = %remote.target.bucket,
                    key = %file.remote_key,
                    "{}",
                    DELETE_FAILURE_MESSAGE
                );
                result.record_failure(file, e.to_string());
            }
        }

        result
    }

    /// Read every file, submit the readable ones as one batch, and return one outcome
    /// per input file in input order.
    async fn upload_batch(
        &self,
        remote: &Remote,
        files: &[MirrorFile],
    ) -> Vec<Result<(), StorageError>> {
        let reads = join_all(
            files
                .iter()
                .map(|file| tokio::fs::read(&file.absolute_local_path)),
        )
        .await;

        let mut outcomes: Vec<Option<Result<(), StorageError>>> = Vec::with_capacity(files.len());
        let mut submitted = Vec::new();
        let mut requests = Vec::new();

        for (index, (file, read)) in files.iter().zip(reads).enumerate() {
            match read {
                Ok(body) => {
                    requests.push(PutObject {
                        bucket: remote.target.bucket.clone(),
                        key: file.remote_key.clone(),
                        body: Bytes::from(body),
                        acl: self.acl.clone(),
                        content_type: mime_guess::from_path(&file.absolute_local_path)
                            .first_raw()
                            .map(str::to_string),
                    });
                    submitted.push(index);
                    outcomes.push(None);
                }
                Err(e) => outcomes.push(Some(Err(StorageError::ReadFailed(format!(
                    "Failed to read {}: {}",
                    file.absolute_local_path.display(),
                    e
                ))))),
            }
        }

        let put_results = remote.store.put_batch(requests).await;
        for (index, put_result) in submitted.into_iter().zip(put_results) {
            outcomes[index] = Some(put_result);
        }

        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|| {
                    Err(StorageError::BackendError(
                        "Object store returned fewer results than requests".to_string(),
                    ))
                })
            })
            .collect()
    }
}
