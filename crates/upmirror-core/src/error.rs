//! Error types module
//!
//! `MirrorError` covers malformed host payloads and configuration problems found
//! while resolving what to mirror. Transfer failures live in the storage crate.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Invalid variant filename '{0}': must be a plain filename")]
    InvalidVariant(String),

    #[error("Invalid primary path '{0}': must name a file")]
    InvalidPrimary(String),

    #[error("Path escapes the uploads root: {}", .0.display())]
    PathTraversal(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),
}
