//! Upmirror Storage Library
//!
//! This crate provides the object-store capability the mirror engine writes through:
//! the `ObjectStore` trait plus adapters for S3-compatible services and for a local
//! directory tree.
//!
//! # Object layout
//!
//! Adapters receive fully-formed `(bucket, key)` pairs; they never derive keys
//! themselves. Key generation lives in `upmirror_core::keys`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_object_store;
#[cfg(feature = "storage-s3")]
pub use factory::create_object_store_with;
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStore;
#[cfg(feature = "storage-s3")]
pub use s3::{S3ClientParams, S3ObjectStore};
pub use traits::{ObjectStore, PutObject, StorageError, StorageResult};
pub use upmirror_core::BackendKind;
