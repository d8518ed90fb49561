//! Syncer error types.

use std::path::PathBuf;

use crate::file::FsError;

/// Errors that stop the directory syncer.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// A copy or delete failed. The mirror can no longer be trusted.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// The filesystem watcher could not be created or registered.
    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// An event referred to a path outside the source directory.
    #[error("Path {path} is not inside the mod source directory {root}")]
    OutsideSource { path: PathBuf, root: PathBuf },
}
