use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Object-store backend types
///
/// Selected with `MIRROR_BACKEND`. `S3` talks to an S3-compatible service, `Local`
/// mirrors into a directory tree (handy for development and smoke tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    S3,
    Local,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(BackendKind::S3),
            "local" => Ok(BackendKind::Local),
            _ => Err(anyhow::anyhow!("Invalid mirror backend: {}", s)),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BackendKind::S3 => write!(f, "s3"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("s3".parse::<BackendKind>().unwrap(), BackendKind::S3);
        assert_eq!(" Local ".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert!("nfs".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_display_round_trips() {
        for kind in [BackendKind::S3, BackendKind::Local] {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }
}
