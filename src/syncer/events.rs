//! Sync events reported to the orchestrator.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// A change observed in the source tree, before it is mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsChange {
    /// A file or directory appeared.
    Created(PathBuf),
    /// A file's contents changed.
    Modified(PathBuf),
    /// A file or directory disappeared.
    Removed(PathBuf),
}

impl FsChange {
    /// The absolute source path the change refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(path) | Self::Modified(path) | Self::Removed(path) => path,
        }
    }
}

/// What the syncer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEventKind {
    Added,
    Changed,
    Removed,
    AddedDir,
    RemovedDir,
    /// The watcher reported a problem. Syncing continues.
    Error(String),
}

/// One completed sync action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub kind: SyncEventKind,
    /// Path relative to the source root. Empty for watcher errors.
    pub path: PathBuf,
    /// Set for the main script: the action happened but should not be
    /// announced, since the build success message already covers it.
    pub quiet: bool,
}

impl SyncEvent {
    #[must_use]
    pub fn new(kind: SyncEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            quiet: false,
        }
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// A watcher error event.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(SyncEventKind::Error(message.into()), PathBuf::new())
    }

    /// Human-readable status line, e.g. `File added: /resources/gfx/a.png`.
    #[must_use]
    pub fn describe(&self) -> String {
        let label = match &self.kind {
            SyncEventKind::Added => "File added",
            SyncEventKind::Changed => "File changed",
            SyncEventKind::Removed => "File removed",
            SyncEventKind::AddedDir => "Directory added",
            SyncEventKind::RemovedDir => "Directory removed",
            SyncEventKind::Error(message) => return format!("Error: {message}"),
        };
        format!("{label}: {MAIN_SEPARATOR}{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_file_events() {
        let path = Path::new("resources").join("a.png");
        let sep = MAIN_SEPARATOR;

        assert_eq!(
            SyncEvent::new(SyncEventKind::Added, &path).describe(),
            format!("File added: {sep}resources{sep}a.png")
        );
        assert_eq!(
            SyncEvent::new(SyncEventKind::Changed, &path).describe(),
            format!("File changed: {sep}resources{sep}a.png")
        );
        assert_eq!(
            SyncEvent::new(SyncEventKind::Removed, &path).describe(),
            format!("File removed: {sep}resources{sep}a.png")
        );
    }

    #[test]
    fn test_describe_directory_events() {
        let sep = MAIN_SEPARATOR;
        assert_eq!(
            SyncEvent::new(SyncEventKind::AddedDir, "gfx").describe(),
            format!("Directory added: {sep}gfx")
        );
        assert_eq!(
            SyncEvent::new(SyncEventKind::RemovedDir, "gfx").describe(),
            format!("Directory removed: {sep}gfx")
        );
    }

    #[test]
    fn test_describe_error() {
        assert_eq!(
            SyncEvent::error("inotify limit").describe(),
            "Error: inotify limit"
        );
    }

    #[test]
    fn test_quiet_flag() {
        let event = SyncEvent::new(SyncEventKind::Changed, "main.lua");
        assert!(!event.quiet);
        assert!(event.quiet().quiet);
    }

    #[test]
    fn test_change_path() {
        let change = FsChange::Removed(PathBuf::from("/mod/a.lua"));
        assert_eq!(change.path(), Path::new("/mod/a.lua"));
    }
}
