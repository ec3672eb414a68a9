//! Remote key generation.
//!
//! Key format: `{prefix}/{relative dir}/{filename}`, with empty segments dropped so the
//! result never starts with `/` and never contains `//`.

use serde::Serialize;

/// Remote destination: bucket name plus the key prefix every object is placed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketTarget {
    pub bucket: String,
    pub key_prefix: String,
}

impl BucketTarget {
    /// Parse a configured bucket path of the form `bucket[/key/prefix...]`.
    ///
    /// The first `/`-separated segment is the bucket (possibly empty), the rest is
    /// re-joined with `/` to form the prefix (empty when there is none).
    pub fn parse(config_path: &str) -> Self {
        let mut segments = config_path.split('/');
        let bucket = segments.next().unwrap_or_default().to_string();
        let key_prefix = segments.collect::<Vec<_>>().join("/");

        BucketTarget { bucket, key_prefix }
    }

    /// Object key for a file under this target's prefix.
    pub fn key_for(&self, relative_dir: &str, filename: &str) -> String {
        map_to_key(&self.key_prefix, relative_dir, filename)
    }
}

/// Split a configured bucket path into a [`BucketTarget`].
pub fn resolve_bucket_target(config_path: &str) -> BucketTarget {
    BucketTarget::parse(config_path)
}

/// Join prefix, relative directory and filename into a normalized object key.
///
/// Leading, trailing and repeated separators in any input are collapsed, and `.`
/// segments are dropped, so `("", "", "a.jpg")` and `("/", "./", "/a.jpg")` both map
/// to `a.jpg`.
pub fn map_to_key(prefix: &str, relative_dir: &str, filename: &str) -> String {
    [prefix, relative_dir, filename]
        .iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_only() {
        let target = BucketTarget::parse("b");
        assert_eq!(target.bucket, "b");
        assert_eq!(target.key_prefix, "");
    }

    #[test]
    fn test_parse_bucket_with_prefix() {
        assert_eq!(BucketTarget::parse("b/p1").key_prefix, "p1");

        let target = BucketTarget::parse("b/p1/p2");
        assert_eq!(target.bucket, "b");
        assert_eq!(target.key_prefix, "p1/p2");
    }

    #[test]
    fn test_parse_is_idempotent() {
        for path in ["b", "b/p1", "b/p1/p2", "", "/leading"] {
            assert_eq!(resolve_bucket_target(path), resolve_bucket_target(path));
        }
    }

    #[test]
    fn test_parse_empty_bucket_is_kept() {
        let target = BucketTarget::parse("/uploads");
        assert_eq!(target.bucket, "");
        assert_eq!(target.key_prefix, "uploads");

        let target = BucketTarget::parse("");
        assert_eq!(target.bucket, "");
        assert_eq!(target.key_prefix, "");
    }

    #[test]
    fn test_map_to_key_basic() {
        assert_eq!(
            map_to_key("media", "2024/05", "photo.jpg"),
            "media/2024/05/photo.jpg"
        );
    }

    #[test]
    fn test_map_to_key_root_level_asset() {
        assert_eq!(map_to_key("media", "", "photo.jpg"), "media/photo.jpg");
        assert_eq!(map_to_key("", "", "photo.jpg"), "photo.jpg");
        assert_eq!(map_to_key("", ".", "photo.jpg"), "photo.jpg");
    }

    #[test]
    fn test_map_to_key_normalizes_separators() {
        let cases = [
            ("/media/", "/2024//05/", "/photo.jpg"),
            ("media//", "2024/05", "//photo.jpg"),
            ("//", "//2024/05//", "photo.jpg"),
        ];

        for (prefix, dir, filename) in cases {
            let key = map_to_key(prefix, dir, filename);
            assert!(!key.starts_with('/'), "leading slash in {}", key);
            assert!(!key.contains("//"), "doubled separator in {}", key);
            assert!(key.ends_with("2024/05/photo.jpg"));
        }
    }

    #[test]
    fn test_key_for_uses_prefix() {
        let target = BucketTarget::parse("assets/site/uploads");
        assert_eq!(
            target.key_for("2024/05", "photo-150x150.jpg"),
            "site/uploads/2024/05/photo-150x150.jpg"
        );
    }
}
