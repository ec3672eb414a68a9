use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The host's uploads root.
///
/// Built once at startup from configuration and handed to the engine by value, so
/// there is no lazily-initialised global to go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRoot {
    pub local_base_dir: PathBuf,
    pub local_base_url: String,
    pub override_base_url: Option<String>,
}

impl UploadRoot {
    pub fn new(local_base_dir: impl Into<PathBuf>, local_base_url: impl Into<String>) -> Self {
        Self {
            local_base_dir: local_base_dir.into(),
            local_base_url: local_base_url.into(),
            override_base_url: None,
        }
    }

    pub fn with_override_base_url(mut self, url: Option<String>) -> Self {
        self.override_base_url = url;
        self
    }

    /// Base URL handed out for public links: the override when set, the local one otherwise.
    pub fn public_base_url(&self) -> &str {
        self.override_base_url
            .as_deref()
            .unwrap_or(&self.local_base_url)
    }
}

/// Upload-location tuple the host resolves for a new upload.
///
/// `path`/`basedir` are local filesystem locations and are never rewritten; only the
/// URL halves may be substituted by the mirror's public endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadDirs {
    pub path: PathBuf,
    pub basedir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl UploadDirs {
    /// Upload-location tuple for a subdirectory (e.g. `2024/05`) of the uploads root.
    pub fn for_subdir(root: &UploadRoot, subdir: &str) -> Self {
        let subdir = subdir.trim_matches('/');
        let base_url = root.local_base_url.trim_end_matches('/');
        let (path, url) = if subdir.is_empty() {
            (root.local_base_dir.clone(), base_url.to_string())
        } else {
            (
                root.local_base_dir.join(subdir),
                format!("{}/{}", base_url, subdir),
            )
        };

        Self {
            path,
            basedir: root.local_base_dir.clone(),
            baseurl: Some(root.local_base_url.clone()),
            url: Some(url),
        }
    }
}
