//! Public URL override for the host's upload-location tuple.

use crate::models::UploadDirs;

/// Point the public URL halves of `dirs` at `override_url`.
///
/// Only applies when both `url` and `baseurl` are present. The old base URL is swapped
/// for the override where it prefixes `url` (ASCII case-insensitive), and `baseurl`
/// becomes the override. Local paths are never touched.
pub fn apply_url_override(mut dirs: UploadDirs, override_url: &str) -> UploadDirs {
    if override_url.is_empty() {
        return dirs;
    }

    let (Some(url), Some(old_base)) = (dirs.url.as_deref(), dirs.baseurl.as_deref()) else {
        return dirs;
    };

    if let Some(rest) = strip_prefix_ignore_ascii_case(url, old_base) {
        dirs.url = Some(format!("{}{}", override_url, rest));
    }
    dirs.baseurl = Some(override_url.to_string());

    dirs
}

fn strip_prefix_ignore_ascii_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}
