//! Defaults shared by configuration and adapters.

/// Region used when `S3_UPLOADS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-west-1";

/// Canned ACL applied to every put when `S3_UPLOADS_OBJECT_ACL` is not set.
pub const DEFAULT_OBJECT_ACL: &str = "public-read";

/// Context attached to the aggregated batch-upload failure log line.
pub const UPLOAD_FAILURE_MESSAGE: &str = "Could not upload files to S3 via command pool";

/// Context attached to a failed remote delete.
pub const DELETE_FAILURE_MESSAGE: &str = "Could not delete file from S3";
