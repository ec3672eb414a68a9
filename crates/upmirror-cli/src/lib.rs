use anyhow::Context;
use std::io::Read;
use std::path::Path;
use upmirror_core::{AssetMetadata, LogFormat};

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("upmirror=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Parse a `name=file` size argument.
pub fn parse_size_arg(arg: &str) -> anyhow::Result<(String, String)> {
    let (name, file) = arg
        .split_once('=')
        .with_context(|| format!("Size '{}' must look like name=file", arg))?;

    let (name, file) = (name.trim(), file.trim());
    if name.is_empty() || file.is_empty() {
        anyhow::bail!("Size '{}' must look like name=file", arg);
    }

    Ok((name.to_string(), file.to_string()))
}

/// Assemble asset metadata from `--file` and `--size` arguments.
pub fn metadata_from_args(file: &str, sizes: &[String]) -> anyhow::Result<AssetMetadata> {
    sizes
        .iter()
        .try_fold(AssetMetadata::new(file), |metadata, arg| {
            let (name, variant) = parse_size_arg(arg)?;
            Ok(metadata.with_variant(name, variant))
        })
}

/// Load host metadata JSON from a file, or from stdin when the path is `-`.
pub fn read_metadata(path: &Path) -> anyhow::Result<AssetMetadata> {
    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read metadata from stdin")?;
        raw
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Metadata is not valid asset JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_arg_valid() {
        assert_eq!(
            parse_size_arg("thumbnail=photo-150x150.jpg").unwrap(),
            ("thumbnail".to_string(), "photo-150x150.jpg".to_string())
        );
        assert_eq!(
            parse_size_arg(" medium = m.jpg ").unwrap(),
            ("medium".to_string(), "m.jpg".to_string())
        );
    }

    #[test]
    fn parse_size_arg_invalid() {
        assert!(parse_size_arg("thumbnail").is_err());
        assert!(parse_size_arg("=photo.jpg").is_err());
        assert!(parse_size_arg("thumbnail=").is_err());
    }

    #[test]
    fn metadata_from_args_keeps_order() {
        let metadata = metadata_from_args(
            "2024/05/photo.jpg",
            &["large=l.jpg".to_string(), "thumbnail=t.jpg".to_string()],
        )
        .unwrap();

        assert_eq!(metadata.primary_relative_path.as_deref(), Some("2024/05/photo.jpg"));
        assert_eq!(metadata.variants[0].name, "large");
        assert_eq!(metadata.variants[1].relative_path, "t.jpg");
    }

    #[test]
    fn metadata_from_args_rejects_bad_size() {
        assert!(metadata_from_args("a.jpg", &["oops".to_string()]).is_err());
    }

    #[test]
    fn read_metadata_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{"file": "2024/05/photo.jpg", "sizes": {"thumbnail": {"file": "t.jpg"}}}"#,
        )
        .unwrap();

        let metadata = read_metadata(&path).unwrap();
        assert_eq!(metadata.variants.len(), 1);
        assert_eq!(metadata.variants[0].name, "thumbnail");
    }

    #[test]
    fn read_metadata_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(read_metadata(&path).is_err());
        assert!(read_metadata(&dir.path().join("missing.json")).is_err());
    }
}
