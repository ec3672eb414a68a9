//! Binds a [`MirrorEngine`] to the host's lifecycle hooks.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use upmirror_core::{apply_url_override, AssetMetadata, UploadDirs};

use crate::engine::MirrorEngine;
use crate::events::{HostEvents, HostSubscriber};

/// Forwards host events to the engine and applies the public URL override.
pub struct MirrorSubscriber {
    engine: Arc<MirrorEngine>,
    override_base_url: Option<String>,
}

impl MirrorSubscriber {
    pub fn new(engine: Arc<MirrorEngine>, override_base_url: Option<String>) -> Self {
        Self {
            engine,
            override_base_url,
        }
    }

    /// Subscriber whose URL override comes from the engine's uploads root.
    pub fn for_engine(engine: Arc<MirrorEngine>) -> Self {
        let override_base_url = engine.upload_root().override_base_url.clone();
        Self::new(engine, override_base_url)
    }
}

#[async_trait]
impl HostSubscriber for MirrorSubscriber {
    fn name(&self) -> &str {
        "uploads-mirror"
    }

    fn filter_upload_dir(&self, dirs: UploadDirs) -> UploadDirs {
        match self.override_base_url.as_deref() {
            Some(url) => apply_url_override(dirs, url),
            None => dirs,
        }
    }

    async fn asset_created(&self, metadata: &AssetMetadata) {
        let result = self.engine.on_asset_created(metadata).await;
        tracing::debug!(
            attempted = result.attempted(),
            failed = result.failed.len(),
            "Asset created hook finished"
        );
    }

    async fn asset_deleted(&self, absolute_local_path: &Path) {
        let result = self.engine.on_asset_deleted(absolute_local_path).await;
        tracing::debug!(
            attempted = result.attempted(),
            failed = result.failed.len(),
            "Asset deleted hook finished"
        );
    }
}

/// Register the mirror's three hooks (upload location, asset created, asset deleted)
/// with the host.
///
/// The URL override is active whenever one is configured, even if the object store is
/// unavailable.
pub async fn register_bindings(events: &HostEvents, engine: Arc<MirrorEngine>) {
    let subscriber = MirrorSubscriber::for_engine(engine);
    tracing::info!(
        mirror_enabled = subscriber.engine.is_enabled(),
        url_override = subscriber.override_base_url.is_some(),
        "Registering uploads mirror hooks"
    );
    events.subscribe(Arc::new(subscriber)).await;
}
