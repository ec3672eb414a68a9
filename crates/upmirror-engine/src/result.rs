use serde::Serialize;
use upmirror_core::MirrorFile;

/// A file that could not be mirrored, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorFailure {
    pub file: MirrorFile,
    pub error: String,
}

/// Outcome of one mirror operation.
///
/// Both lists keep the order files were resolved in (primary first, then variants).
/// An empty result means nothing was attempted: mirroring disabled, nothing to mirror,
/// or a path outside the uploads root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MirrorResult {
    pub succeeded: Vec<MirrorFile>,
    pub failed: Vec<MirrorFailure>,
}

impl MirrorResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, file: MirrorFile) {
        self.succeeded.push(file);
    }

    pub fn record_failure(&mut self, file: MirrorFile, error: impl Into<String>) {
        self.failed.push(MirrorFailure {
            file,
            error: error.into(),
        });
    }

    /// Number of files an operation was attempted for.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempted() == 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// All failure messages joined into one line, for the aggregated log entry.
    pub fn failure_summary(&self) -> String {
        self.failed
            .iter()
            .map(|failure| {
                format!(
                    "{}: {}",
                    failure.file.absolute_local_path.display(),
                    failure.error
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
