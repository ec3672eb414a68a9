//! Upmirror Core Library
//!
//! This crate provides the domain models, configuration, key mapping and path
//! resolution shared by the mirror engine, the object-store adapters and the CLI.
//!
//! # Remote key format
//!
//! Every mirrored file lands under the configured bucket target:
//!
//! - **Bucket path** `bucket[/key/prefix...]`, parsed once into a [`BucketTarget`]
//! - **Object key** `{prefix}/{relative dir under the uploads root}/{filename}`
//!
//! Keys never carry a leading `/` or doubled separators. Key generation lives in the
//! `keys` module so the create and delete paths cannot drift apart.

pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;
pub mod paths;
pub mod storage_types;
pub mod url_override;

// Re-export commonly used types
pub use config::{LogFormat, MirrorConfig};
pub use error::MirrorError;
pub use keys::{map_to_key, resolve_bucket_target, BucketTarget};
pub use models::{AssetMetadata, MirrorFile, ObjectAcl, SizeVariant, UploadDirs, UploadRoot};
pub use paths::{enumerate_files, resolve_delete_target};
pub use storage_types::BackendKind;
pub use url_override::apply_url_override;
