//! Filesystem error types.

use std::path::PathBuf;

/// Errors that can occur during filesystem operations.
#[derive(thiserror::Error, Debug)]
pub enum FsError {
    /// Copying a file or directory failed.
    #[error("Failed to copy \"{src}\" to \"{dst}\": {source}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deleting a file or directory failed.
    #[error("Failed to delete \"{path}\": {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Checking whether a path exists failed.
    #[error("Failed to check if \"{path}\" exists: {source}")]
    Exists {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing a directory failed.
    #[error("Failed to get the files in the \"{path}\" directory: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading file metadata failed.
    #[error("Failed to get the file stats for \"{path}\": {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating a directory failed.
    #[error("Failed to create the \"{path}\" directory: {source}")]
    MakeDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a file failed.
    #[error("Failed to read the \"{path}\" file: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("Failed to write to the \"{path}\" file: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// The underlying I/O error.
    #[must_use]
    pub fn io_error(&self) -> &std::io::Error {
        match self {
            Self::Copy { source, .. }
            | Self::Delete { source, .. }
            | Self::Exists { source, .. }
            | Self::ReadDir { source, .. }
            | Self::Metadata { source, .. }
            | Self::MakeDir { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. } => source,
        }
    }

    /// Returns true if the failure was caused by a missing path.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.io_error().kind() == std::io::ErrorKind::NotFound
    }
}
