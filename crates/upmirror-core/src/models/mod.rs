//! Domain models
//!
//! - `asset`: metadata the host emits when an asset (and its size variants) is generated
//! - `upload`: the uploads root and the host's upload-location tuple
//! - `mirror`: per-file mirror units and object ACLs

mod asset;
mod mirror;
mod upload;

pub use asset::{AssetMetadata, SizeVariant};
pub use mirror::{MirrorFile, ObjectAcl};
pub use upload::{UploadDirs, UploadRoot};
