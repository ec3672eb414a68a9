use crate::traits::{ObjectStore, PutObject, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use upmirror_core::{BackendKind, MirrorConfig};

/// Parameters the S3 client is built from.
///
/// Derived from configuration, and open to rewriting by the caller before the client
/// exists (see `create_object_store_with`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3ClientParams {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible providers (e.g. "http://localhost:9000" for MinIO)
    pub endpoint_url: Option<String>,
    /// Path-style addressing, required by most S3-compatible providers
    pub force_path_style: bool,
}

impl S3ClientParams {
    pub fn from_config(config: &MirrorConfig) -> Self {
        let (access_key_id, secret_access_key) = match config.static_credentials() {
            Some((key, secret)) => (Some(key.to_string()), Some(secret.to_string())),
            None => (None, None),
        };

        S3ClientParams {
            region: config.region.clone(),
            access_key_id,
            secret_access_key,
            endpoint_url: config.endpoint.clone(),
            force_path_style: config.endpoint.is_some(),
        }
    }
}

/// S3 object-store implementation
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore instance
    ///
    /// Static credentials are used only when both halves are present; otherwise the
    /// default AWS credential chain (env, profile, instance metadata) applies.
    pub async fn new(params: S3ClientParams) -> StorageResult<Self> {
        let region_provider =
            RegionProviderChain::first_try(Region::new(params.region.clone()));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

        match (&params.access_key_id, &params.secret_access_key) {
            (Some(key), Some(secret)) => {
                let credentials =
                    Credentials::new(key.clone(), secret.clone(), None, None, "upmirror-static");
                loader = loader.credentials_provider(credentials);
            }
            (None, None) => {}
            _ => {
                return Err(StorageError::ConfigError(
                    "S3 access key and secret must be provided together".to_string(),
                ))
            }
        }

        let shared_config = loader.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(ref endpoint) = params.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }
        s3_config_builder = s3_config_builder.force_path_style(params.force_path_style);

        let client = Client::from_conf(s3_config_builder.build());

        tracing::debug!(
            region = %params.region,
            endpoint = ?params.endpoint_url,
            path_style = params.force_path_style,
            "S3 client initialized"
        );

        Ok(S3ObjectStore { client })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, request: PutObject) -> StorageResult<()> {
        let size = request.body.len() as u64;
        let start = std::time::Instant::now();

        let mut put = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .acl(ObjectCannedAcl::from(request.acl.as_str()))
            .body(ByteStream::from(request.body));
        if let Some(ref content_type) = request.content_type {
            put = put.content_type(content_type);
        }

        put.send().await.map_err(|e| {
            let error = DisplayErrorContext(&e).to_string();
            tracing::error!(
                error = %error,
                bucket = %request.bucket,
                key = %request.key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(error)
        })?;

        tracing::info!(
            bucket = %request.bucket,
            key = %request.key,
            acl = %request.acl,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let error = DisplayErrorContext(&e).to_string();
                tracing::error!(
                    error = %error,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(error)
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> BackendKind {
        BackendKind::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> MirrorConfig {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MirrorConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_params_default_region_and_ambient_credentials() {
        let params = S3ClientParams::from_config(&config(&[
            ("UPLOADS_BASEDIR", "/srv/uploads"),
            ("UPLOADS_BASEURL", "https://site.test/uploads"),
            ("S3_UPLOADS_BUCKET", "media"),
        ]));

        assert_eq!(params.region, "us-west-1");
        assert!(params.access_key_id.is_none());
        assert!(params.endpoint_url.is_none());
        assert!(!params.force_path_style);
    }

    #[test]
    fn test_params_endpoint_enables_path_style() {
        let params = S3ClientParams::from_config(&config(&[
            ("UPLOADS_BASEDIR", "/srv/uploads"),
            ("UPLOADS_BASEURL", "https://site.test/uploads"),
            ("S3_UPLOADS_ENDPOINT", "http://localhost:9000"),
            ("S3_UPLOADS_KEY", "minio"),
            ("S3_UPLOADS_SECRET", "minio-secret"),
        ]));

        assert_eq!(params.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(params.force_path_style);
        assert_eq!(params.access_key_id.as_deref(), Some("minio"));
        assert_eq!(params.secret_access_key.as_deref(), Some("minio-secret"));
    }

    #[tokio::test]
    async fn test_new_rejects_half_credentials() {
        let params = S3ClientParams {
            region: "us-west-1".to_string(),
            access_key_id: Some("key".to_string()),
            secret_access_key: None,
            endpoint_url: None,
            force_path_style: false,
        };

        let result = S3ObjectStore::new(params).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
