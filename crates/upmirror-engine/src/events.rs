//! Host-side subscription list for asset lifecycle hooks.
//!
//! The host owns a [`HostEvents`] and dispatches into it; subscribers never see the
//! host's own dispatch mechanism. Every hook is a pass-through: the value the host
//! hands in is the value it gets back, apart from the upload-location filter which
//! may rewrite public URLs.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use upmirror_core::{AssetMetadata, UploadDirs};

/// A listener for host lifecycle hooks. Every method defaults to doing nothing.
#[async_trait]
pub trait HostSubscriber: Send + Sync {
    /// Subscriber name, for diagnostics
    fn name(&self) -> &str;

    /// Rewrite the upload-location tuple before the host uses it.
    fn filter_upload_dir(&self, dirs: UploadDirs) -> UploadDirs {
        dirs
    }

    /// An asset and its size variants have been generated on disk.
    async fn asset_created(&self, _metadata: &AssetMetadata) {}

    /// A file under the uploads tree is about to be deleted.
    async fn asset_deleted(&self, _absolute_local_path: &Path) {}
}

/// Ordered list of subscribers the host dispatches lifecycle events to.
///
/// Cloning is cheap and clones share the same list. Registration normally happens
/// once at startup.
#[derive(Clone, Default)]
pub struct HostEvents {
    subscribers: Arc<RwLock<Vec<Arc<dyn HostSubscriber>>>>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber. Subscribers run in registration order.
    pub async fn subscribe(&self, subscriber: Arc<dyn HostSubscriber>) {
        tracing::debug!(subscriber = %subscriber.name(), "Registered host subscriber");
        self.subscribers.write().await.push(subscriber);
    }

    pub async fn subscriber_names(&self) -> Vec<String> {
        self.subscribers
            .read()
            .await
            .iter()
            .map(|subscriber| subscriber.name().to_string())
            .collect()
    }

    /// Run the upload-location tuple through every subscriber's filter.
    pub async fn upload_dir(&self, dirs: UploadDirs) -> UploadDirs {
        self.snapshot()
            .await
            .iter()
            .fold(dirs, |dirs, subscriber| subscriber.filter_upload_dir(dirs))
    }

    /// Notify subscribers of a generated asset and hand the metadata back unchanged.
    pub async fn asset_created(&self, metadata: AssetMetadata) -> AssetMetadata {
        for subscriber in self.snapshot().await {
            subscriber.asset_created(&metadata).await;
        }
        metadata
    }

    /// Notify subscribers of a file deletion and hand the path back unchanged.
    pub async fn asset_deleted(&self, absolute_local_path: PathBuf) -> PathBuf {
        for subscriber in self.snapshot().await {
            subscriber.asset_deleted(&absolute_local_path).await;
        }
        absolute_local_path
    }

    // Cloned so dispatch runs without holding the lock.
    async fn snapshot(&self) -> Vec<Arc<dyn HostSubscriber>> {
        self.subscribers.read().await.clone()
    }
}
