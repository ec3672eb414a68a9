//! Configuration module
//!
//! Reads the mirror settings from the environment (after loading `.env` when present).
//! Everything except the uploads root is optional: without `S3_UPLOADS_BUCKET` the
//! mirror is simply disabled.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::DEFAULT_REGION;
use crate::error::MirrorError;
use crate::keys::BucketTarget;
use crate::models::{ObjectAcl, UploadRoot};
use crate::storage_types::BackendKind;

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MirrorConfig {
    /// `bucket[/key/prefix]`; `None` disables mirroring.
    pub bucket_path: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...); implies path-style.
    pub endpoint: Option<String>,
    /// Public base URL substituted into the host's upload-location tuple.
    pub public_base_url: Option<String>,
    pub object_acl: ObjectAcl,
    pub uploads_basedir: PathBuf,
    pub uploads_baseurl: String,
    pub backend: BackendKind,
    pub local_root: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl MirrorConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = match var("MIRROR_BACKEND") {
            Some(value) => value.parse()?,
            None => BackendKind::default(),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        let config = MirrorConfig {
            bucket_path: var("S3_UPLOADS_BUCKET"),
            region: var("S3_UPLOADS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key_id: var("S3_UPLOADS_KEY"),
            secret_access_key: var("S3_UPLOADS_SECRET"),
            endpoint: var("S3_UPLOADS_ENDPOINT"),
            public_base_url: var("S3_UPLOADS_BUCKET_URL"),
            object_acl: var("S3_UPLOADS_OBJECT_ACL")
                .map(ObjectAcl::new)
                .unwrap_or_default(),
            uploads_basedir: var("UPLOADS_BASEDIR")
                .map(PathBuf::from)
                .ok_or_else(|| anyhow::anyhow!("UPLOADS_BASEDIR must be set"))?,
            uploads_baseurl: var("UPLOADS_BASEURL")
                .ok_or_else(|| anyhow::anyhow!("UPLOADS_BASEURL must be set"))?,
            backend,
            local_root: var("MIRROR_LOCAL_ROOT").map(PathBuf::from),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(MirrorError::Config(
                "S3_UPLOADS_KEY and S3_UPLOADS_SECRET must be set together".to_string(),
            ));
        }

        if let Some(ref endpoint) = self.endpoint {
            if !is_http_url(endpoint) {
                return Err(MirrorError::Config(
                    "S3_UPLOADS_ENDPOINT must be an http:// or https:// URL".to_string(),
                ));
            }
        }

        if let Some(ref url) = self.public_base_url {
            if !is_http_url(url) {
                return Err(MirrorError::Config(
                    "S3_UPLOADS_BUCKET_URL must be an http:// or https:// URL".to_string(),
                ));
            }
        }

        if self.backend == BackendKind::Local && self.local_root.is_none() {
            return Err(MirrorError::Config(
                "MIRROR_LOCAL_ROOT must be set when using the local mirror backend".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a bucket is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.bucket_path.is_some()
    }

    /// Parsed bucket target, or `None` when mirroring is not configured.
    pub fn bucket_target(&self) -> Option<BucketTarget> {
        self.bucket_path.as_deref().map(BucketTarget::parse)
    }

    pub fn upload_root(&self) -> UploadRoot {
        UploadRoot::new(self.uploads_basedir.clone(), self.uploads_baseurl.clone())
            .with_override_base_url(self.public_base_url.clone())
    }

    /// Static credentials, only when both halves are configured.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
