use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use crate::constants::DEFAULT_OBJECT_ACL;

/// One file to mirror: where it lives locally and which key it gets remotely.
///
/// Created per operation and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MirrorFile {
    pub absolute_local_path: PathBuf,
    pub remote_key: String,
}

impl MirrorFile {
    pub fn new(absolute_local_path: impl Into<PathBuf>, remote_key: impl Into<String>) -> Self {
        Self {
            absolute_local_path: absolute_local_path.into(),
            remote_key: remote_key.into(),
        }
    }
}

/// Canned object ACL sent with every put (`public-read`, `private`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectAcl(String);

impl ObjectAcl {
    pub fn new(acl: impl Into<String>) -> Self {
        Self(acl.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectAcl {
    fn default() -> Self {
        Self(DEFAULT_OBJECT_ACL.to_string())
    }
}

impl Display for ObjectAcl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
