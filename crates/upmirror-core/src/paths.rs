//! Path resolution: which local files belong to an asset, and which remote key each gets.

use std::path::{Component, Path};

use crate::error::MirrorError;
use crate::keys::BucketTarget;
use crate::models::{AssetMetadata, MirrorFile, UploadRoot};

/// Enumerate every file to mirror for one asset: the primary first, then each size
/// variant in host order. A file listed more than once (two sizes sharing a filename, or a
/// size repeating the primary) is kept only at its first position.
///
/// Variants are siblings of the primary file, so their local path and remote key both
/// use the primary's directory. An asset without a primary path yields an empty list.
///
/// Returns an error for a variant name that is not a plain filename, for a primary path
/// that ends in a directory, or for one that climbs out of the uploads root.
pub fn enumerate_files(
    upload_root: &UploadRoot,
    target: &BucketTarget,
    metadata: &AssetMetadata,
) -> Result<Vec<MirrorFile>, MirrorError> {
    let Some(primary) = metadata.primary_relative_path.as_deref() else {
        return Ok(Vec::new());
    };

    let primary = primary.trim_start_matches('/');
    if primary.is_empty() {
        return Ok(Vec::new());
    }

    let primary_path = Path::new(primary);
    if primary_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(MirrorError::PathTraversal(primary_path.to_path_buf()));
    }

    let (relative_dir, primary_name) = match primary.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", primary),
    };
    if primary_name.is_empty() || primary_name == "." {
        return Err(MirrorError::InvalidPrimary(primary.to_string()));
    }
    let local_dir = upload_root.local_base_dir.join(relative_dir);

    let mut files = Vec::with_capacity(1 + metadata.variants.len());
    files.push(MirrorFile::new(
        upload_root.local_base_dir.join(primary),
        target.key_for(relative_dir, primary_name),
    ));

    for variant in &metadata.variants {
        let name = variant.relative_path.trim_start_matches('/');
        validate_variant_filename(name)?;

        let local_path = local_dir.join(name);
        if files
            .iter()
            .any(|file| file.absolute_local_path == local_path)
        {
            continue;
        }
        files.push(MirrorFile::new(local_path, target.key_for(relative_dir, name)));
    }

    Ok(files)
}

fn validate_variant_filename(name: &str) -> Result<(), MirrorError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(MirrorError::InvalidVariant(name.to_string()));
    }
    Ok(())
}

/// Map a local path being deleted to its remote object.
///
/// Returns `None` when the path is not inside the uploads root (compared component-wise),
/// is the root itself, walks upward with `..`, or is not valid UTF-8. The remaining
/// subpath becomes the key suffix as-is, mirroring the on-disk layout.
pub fn resolve_delete_target(
    upload_root: &UploadRoot,
    target: &BucketTarget,
    absolute_local_path: &Path,
) -> Option<MirrorFile> {
    let subpath = absolute_local_path
        .strip_prefix(&upload_root.local_base_dir)
        .ok()?;

    let mut segments = Vec::new();
    for component in subpath.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if segments.is_empty() {
        return None;
    }

    let remote_key = target.key_for("", &segments.join("/"));
    Some(MirrorFile::new(absolute_local_path, remote_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> UploadRoot {
        UploadRoot::new("/srv/site/uploads", "https://site.test/uploads")
    }

    fn target() -> BucketTarget {
        BucketTarget::parse("media-bucket/site")
    }

    #[test]
    fn test_enumerate_primary_and_variants_in_order() {
        let metadata = AssetMetadata::new("2024/05/photo.jpg")
            .with_variant("thumbnail", "photo-150x150.jpg")
            .with_variant("medium", "photo-300x200.jpg")
            .with_variant("large", "photo-1024x683.jpg");

        let files = enumerate_files(&root(), &target(), &metadata).unwrap();

        assert_eq!(files.len(), 4);
        assert_eq!(
            files[0],
            MirrorFile::new("/srv/site/uploads/2024/05/photo.jpg", "site/2024/05/photo.jpg")
        );
        assert_eq!(
            files[1].absolute_local_path,
            PathBuf::from("/srv/site/uploads/2024/05/photo-150x150.jpg")
        );
        assert_eq!(files[2].remote_key, "site/2024/05/photo-300x200.jpg");
        assert_eq!(files[3].remote_key, "site/2024/05/photo-1024x683.jpg");
        for file in &files {
            assert!(file.remote_key.starts_with("site/2024/05/"));
        }
    }

    #[test]
    fn test_enumerate_root_level_asset() {
        let metadata = AssetMetadata::new("/logo.png").with_variant("thumbnail", "logo-150x150.png");

        let files = enumerate_files(&root(), &BucketTarget::parse("media-bucket"), &metadata).unwrap();

        assert_eq!(files[0].absolute_local_path, PathBuf::from("/srv/site/uploads/logo.png"));
        assert_eq!(files[0].remote_key, "logo.png");
        assert_eq!(files[1].remote_key, "logo-150x150.png");
    }

    #[test]
    fn test_enumerate_without_primary_is_empty() {
        let metadata = AssetMetadata::default();
        assert!(enumerate_files(&root(), &target(), &metadata).unwrap().is_empty());

        let metadata = AssetMetadata::new("");
        assert!(enumerate_files(&root(), &target(), &metadata).unwrap().is_empty());
    }

    #[test]
    fn test_enumerate_rejects_variant_with_separator() {
        for bad in ["../secret.jpg", "nested/photo.jpg", "win\\photo.jpg", "", ".."] {
            let metadata = AssetMetadata::new("2024/05/photo.jpg").with_variant("bad", bad);
            let result = enumerate_files(&root(), &target(), &metadata);
            assert!(
                matches!(result, Err(MirrorError::InvalidVariant(_))),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_enumerate_strips_single_leading_slash_of_variant() {
        let metadata = AssetMetadata::new("2024/05/photo.jpg").with_variant("thumb", "/thumb.jpg");
        let files = enumerate_files(&root(), &target(), &metadata).unwrap();
        assert_eq!(files[1].remote_key, "site/2024/05/thumb.jpg");
    }

    #[test]
    fn test_enumerate_rejects_primary_traversal() {
        let metadata = AssetMetadata::new("2024/../../etc/passwd");
        let result = enumerate_files(&root(), &target(), &metadata);
        assert!(matches!(result, Err(MirrorError::PathTraversal(_))));
    }

    #[test]
    fn test_enumerate_skips_repeated_files() {
        let metadata = AssetMetadata::new("2024/05/photo.jpg")
            .with_variant("medium", "photo-300x200.jpg")
            .with_variant("medium_large", "photo-300x200.jpg")
            .with_variant("full", "photo.jpg")
            .with_variant("large", "photo-1024x683.jpg");

        let files = enumerate_files(&root(), &target(), &metadata).unwrap();

        let keys: Vec<&str> = files.iter().map(|file| file.remote_key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "site/2024/05/photo.jpg",
                "site/2024/05/photo-300x200.jpg",
                "site/2024/05/photo-1024x683.jpg",
            ]
        );
    }

    #[test]
    fn test_enumerate_rejects_primary_without_filename() {
        for bad in ["2024/05/", "2024/05/.", "/2024/"] {
            let metadata = AssetMetadata::new(bad).with_variant("thumb", "t.jpg");
            let result = enumerate_files(&root(), &target(), &metadata);
            assert!(
                matches!(result, Err(MirrorError::InvalidPrimary(_))),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_delete_target_under_root() {
        let path = Path::new("/srv/site/uploads/2024/05/photo-150x150.jpg");
        let file = resolve_delete_target(&root(), &target(), path).unwrap();

        assert_eq!(file.remote_key, "site/2024/05/photo-150x150.jpg");
        assert_eq!(file.absolute_local_path, path);
    }

    #[test]
    fn test_delete_target_outside_root_is_none() {
        for path in [
            "/tmp/photo.jpg",
            "/srv/site/uploads-old/photo.jpg",
            "/srv/site/uploads",
            "/srv/site/uploads/../secrets.txt",
            "relative/photo.jpg",
        ] {
            assert!(
                resolve_delete_target(&root(), &target(), Path::new(path)).is_none(),
                "expected no target for {}",
                path
            );
        }
    }

    #[test]
    fn test_delete_target_without_prefix() {
        let file = resolve_delete_target(
            &root(),
            &BucketTarget::parse("media-bucket"),
            Path::new("/srv/site/uploads/logo.png"),
        )
        .unwrap();
        assert_eq!(file.remote_key, "logo.png");
    }
}
