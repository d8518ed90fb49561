//! Source-to-target mirroring.

use std::path::{Path, PathBuf};

use crate::file::{self, FsError};
use crate::project::MAIN_LUA;

use super::error::SyncError;
use super::events::{FsChange, SyncEvent, SyncEventKind};

/// Keeps `target_root` an exact copy of `source_root`.
#[derive(Debug, Clone)]
pub struct Mirror {
    source_root: PathBuf,
    target_root: PathBuf,
    main_script: PathBuf,
    /// Resolved form of `source_root`, if it differs. Some watch backends
    /// report events under the resolved path.
    resolved_source_root: Option<PathBuf>,
}

impl Mirror {
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            main_script: PathBuf::from(MAIN_LUA),
            resolved_source_root: None,
        }
    }

    /// Use a different main script, relative to the source root.
    #[must_use]
    pub fn with_main_script(mut self, relative: impl Into<PathBuf>) -> Self {
        self.main_script = relative.into();
        self
    }

    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    #[must_use]
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// The directory to register with the filesystem watcher.
    #[must_use]
    pub fn watch_root(&self) -> &Path {
        self.resolved_source_root
            .as_deref()
            .unwrap_or(&self.source_root)
    }

    /// Path of `path` relative to the source root.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::OutsideSource` if `path` is not below the source root.
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf, SyncError> {
        path.strip_prefix(&self.source_root)
            .or_else(|e| match self.resolved_source_root {
                Some(ref resolved) => path.strip_prefix(resolved),
                None => Err(e),
            })
            .map(Path::to_path_buf)
            .map_err(|_| SyncError::OutsideSource {
                path: path.to_path_buf(),
                root: self.source_root.clone(),
            })
    }

    /// Where a source path lands in the target tree.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::OutsideSource` if `path` is not below the source root.
    pub fn target_path(&self, path: &Path) -> Result<PathBuf, SyncError> {
        Ok(self.target_root.join(self.relative_path(path)?))
    }

    /// Establish the baseline mirror.
    ///
    /// Creates the source directory if it is missing, deletes the target and
    /// copies the whole source tree over. Running it twice gives the same
    /// result as running it once.
    ///
    /// # Errors
    ///
    /// Returns an error if any filesystem operation fails.
    pub fn initial_sync(&mut self) -> Result<(), SyncError> {
        if !file::path_exists(&self.source_root)? {
            file::make_dir(&self.source_root)?;
        }
        if file::path_exists(&self.target_root)? {
            file::delete_file_or_directory(&self.target_root)?;
        }
        file::copy(&self.source_root, &self.target_root)?;

        self.resolved_source_root = std::fs::canonicalize(&self.source_root)
            .ok()
            .filter(|resolved| resolved != &self.source_root);

        tracing::info!(
            source = %self.source_root.display(),
            target = %self.target_root.display(),
            "Initial mirror complete"
        );
        Ok(())
    }

    /// Mirror one source change into the target tree.
    ///
    /// Returns the event to report, or `None` when there is nothing to report:
    /// the path vanished before it could be copied, the target was already
    /// gone, or the main script was created empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a copy or delete fails.
    pub fn apply(&self, change: &FsChange) -> Result<Option<SyncEvent>, SyncError> {
        match change {
            FsChange::Created(path) => self.on_created(path),
            FsChange::Modified(path) => self.on_modified(path),
            FsChange::Removed(path) => self.on_removed(path),
        }
    }

    fn on_created(&self, path: &Path) -> Result<Option<SyncEvent>, SyncError> {
        let Some(is_dir) = source_is_dir(path)? else {
            return Ok(None);
        };
        let relative = self.relative_path(path)?;
        let target = self.target_root.join(&relative);

        if is_dir {
            if !copy_if_present(path, &target)? {
                return Ok(None);
            }
            return Ok(Some(SyncEvent::new(SyncEventKind::AddedDir, relative)));
        }

        let is_main_script = relative == self.main_script;
        let empty = is_main_script && matches!(size_if_present(path)?, Some(0));
        if !copy_if_present(path, &target)? {
            return Ok(None);
        }

        if is_main_script {
            if empty {
                tracing::debug!(path = %relative.display(), "Main script created empty");
                return Ok(None);
            }
            return Ok(Some(SyncEvent::new(SyncEventKind::Added, relative).quiet()));
        }
        Ok(Some(SyncEvent::new(SyncEventKind::Added, relative)))
    }

    fn on_modified(&self, path: &Path) -> Result<Option<SyncEvent>, SyncError> {
        match source_is_dir(path)? {
            None | Some(true) => return Ok(None),
            Some(false) => {}
        }
        let relative = self.relative_path(path)?;
        let target = self.target_root.join(&relative);
        if !copy_if_present(path, &target)? {
            return Ok(None);
        }

        let event = SyncEvent::new(SyncEventKind::Changed, &relative);
        if relative == self.main_script {
            return Ok(Some(event.quiet()));
        }
        Ok(Some(event))
    }

    fn on_removed(&self, path: &Path) -> Result<Option<SyncEvent>, SyncError> {
        let relative = self.relative_path(path)?;
        let target = self.target_root.join(&relative);
        if !file::path_exists(&target)? {
            tracing::debug!(path = %target.display(), "Already absent from target");
            return Ok(None);
        }

        let kind = if file::is_dir(&target)? {
            SyncEventKind::RemovedDir
        } else {
            SyncEventKind::Removed
        };
        file::delete_file_or_directory(&target)?;
        Ok(Some(SyncEvent::new(kind, relative)))
    }
}

/// Whether a source path is a directory, or `None` if it no longer exists.
fn source_is_dir(path: &Path) -> Result<Option<bool>, FsError> {
    match file::is_dir(path) {
        Ok(is_dir) => Ok(Some(is_dir)),
        Err(e) if e.is_not_found() => {
            tracing::debug!(path = %path.display(), "Source vanished before it could be synced");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn size_if_present(path: &Path) -> Result<Option<u64>, FsError> {
    match file::file_size(path) {
        Ok(size) => Ok(Some(size)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Copy `src` to `dst`, returning `false` if `src` disappeared meanwhile.
fn copy_if_present(src: &Path, dst: &Path) -> Result<bool, FsError> {
    match file::copy(src, dst) {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() && !file::path_exists(src)? => {
            tracing::debug!(path = %src.display(), "Source vanished during copy");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Every path below `root` with its file contents, `None` for directories.
///
/// Paths that vanish during the walk are left out.
#[cfg(test)]
pub(crate) fn snapshot(root: &Path) -> std::collections::BTreeMap<PathBuf, Option<Vec<u8>>> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?.to_path_buf();
            if entry.file_type().is_file() {
                let contents = std::fs::read(entry.path()).ok()?;
                Some((relative, Some(contents)))
            } else {
                Some((relative, None))
            }
        })
        .collect()
}
