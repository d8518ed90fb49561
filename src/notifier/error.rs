//! Notifier error types.

use crate::file::FsError;

/// Errors that can occur while writing notifications.
#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    /// Failed to serialize the message list.
    #[error("Failed to serialize notifications: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the message file.
    #[error(transparent)]
    Fs(#[from] FsError),
}
