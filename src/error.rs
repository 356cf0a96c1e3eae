//! Error taxonomy for a synchronization run.
//!
//! Two levels exist:
//! - [`SyncError`] is run-level and fatal. It aborts before any persisted
//!   state is touched.
//! - [`ExtractError`] is per-snapshot. It never escapes a worker task and
//!   degrades only the affected date to an empty Day Facts record.

use std::path::PathBuf;

/// Fatal run-level errors
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("remote listing unavailable: {0}")]
    Transport(String),
    #[error("persisted state is corrupt ({path}): {reason}")]
    PersistedStateCorrupt { path: PathBuf, reason: String },
    #[error("no base state found at {0}; run a full generation first")]
    MissingBaseState(PathBuf),
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-snapshot extraction failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("archive download failed after all attempts")]
    ArchiveFetch,
    #[error("bad archive: {0}")]
    BadArchive(String),
    #[error("extraction task failed: {0}")]
    TaskFailed(String),
}
