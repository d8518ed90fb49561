//! Monitor error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use crate::compiler::CompilerError;
use crate::config::ConfigError;
use crate::file::FsError;
use crate::notifier::NotifyError;
use crate::project::ProjectError;
use crate::syncer::SyncError;

/// Errors that end a `monitor` or `copy` run.
#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Compiler(#[from] CompilerError),

    #[error("The directory syncer failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Failed to find the \"{0}\" directory. Reinstall IsaacScript or pass --watcher-mod.")]
    CompanionModMissing(PathBuf),

    #[error("The directory syncer stopped unexpectedly")]
    SyncerStopped,

    #[error("The compiler exited unexpectedly ({0})")]
    CompilerExited(ExitStatus),

    #[error("The {task} task failed: {message}")]
    TaskFailed {
        task: &'static str,
        message: String,
    },

    #[error("Failed to get the current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syncer_stopped_display() {
        assert_eq!(
            MonitorError::SyncerStopped.to_string(),
            "The directory syncer stopped unexpectedly"
        );
    }

    #[test]
    fn test_task_failed_display() {
        let err = MonitorError::TaskFailed {
            task: "compiler",
            message: "panicked".to_string(),
        };
        assert_eq!(err.to_string(), "The compiler task failed: panicked");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let config_err = ConfigError::NotFound {
            path: PathBuf::from("/project/isaacscript.json"),
        };
        let expected = config_err.to_string();
        let err: MonitorError = config_err.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_companion_mod_missing_names_path() {
        let err = MonitorError::CompanionModMissing(PathBuf::from("/opt/isaacscript-watcher"));
        assert!(err.to_string().contains("/opt/isaacscript-watcher"));
    }
}
