//! Filesystem operations.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::FsError;

/// Copy a file or a directory tree.
///
/// Directories are copied recursively and merged into `dst` if it already
/// exists. Existing files at the destination are overwritten. Missing parent
/// directories of `dst` are created.
///
/// # Errors
///
/// Returns `FsError::Copy` if any entry cannot be read, created or copied.
pub fn copy(src: &Path, dst: &Path) -> Result<(), FsError> {
    tracing::debug!(src = %src.display(), dst = %dst.display(), "Copying");

    let copy_err = |source: std::io::Error| FsError::Copy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(src).map_err(copy_err)?;
    if metadata.is_dir() {
        for entry in WalkDir::new(src) {
            let entry = entry.map_err(|e| copy_err(e.into()))?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| copy_err(std::io::Error::other(e)))?;
            let dest_path = dst.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest_path).map_err(copy_err)?;
            } else {
                if let Some(parent) = dest_path.parent() {
                    fs::create_dir_all(parent).map_err(copy_err)?;
                }
                fs::copy(entry.path(), &dest_path).map_err(copy_err)?;
            }
        }
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(copy_err)?;
        }
        fs::copy(src, dst).map_err(copy_err)?;
    }

    tracing::debug!(src = %src.display(), dst = %dst.display(), "Copied");
    Ok(())
}

/// Delete a file, or a directory and everything below it.
///
/// # Errors
///
/// Returns `FsError::Delete` if the path does not exist or cannot be removed.
pub fn delete_file_or_directory(path: &Path) -> Result<(), FsError> {
    tracing::debug!(path = %path.display(), "Deleting");

    let delete_err = |source: std::io::Error| FsError::Delete {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::symlink_metadata(path).map_err(delete_err)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(delete_err)?;
    } else {
        fs::remove_file(path).map_err(delete_err)?;
    }

    tracing::debug!(path = %path.display(), "Deleted");
    Ok(())
}

/// Check whether a path exists.
///
/// # Errors
///
/// Returns `FsError::Exists` if the existence of the path cannot be determined
/// (for example, a parent directory is not readable).
pub fn path_exists(path: &Path) -> Result<bool, FsError> {
    let exists = path.try_exists().map_err(|source| FsError::Exists {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::trace!(path = %path.display(), exists, "Checked path");
    Ok(exists)
}

/// Check whether a path is a directory, following symbolic links.
///
/// # Errors
///
/// Returns `FsError::Metadata` if the path cannot be stat'ed.
pub fn is_dir(path: &Path) -> Result<bool, FsError> {
    fs::metadata(path)
        .map(|m| m.is_dir())
        .map_err(|source| FsError::Metadata {
            path: path.to_path_buf(),
            source,
        })
}

/// Check whether a path is a regular file, following symbolic links.
///
/// # Errors
///
/// Returns `FsError::Metadata` if the path cannot be stat'ed.
pub fn is_file(path: &Path) -> Result<bool, FsError> {
    fs::metadata(path)
        .map(|m| m.is_file())
        .map_err(|source| FsError::Metadata {
            path: path.to_path_buf(),
            source,
        })
}

/// Size of a file in bytes, following symbolic links.
///
/// # Errors
///
/// Returns `FsError::Metadata` if the path cannot be stat'ed.
pub fn file_size(path: &Path) -> Result<u64, FsError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| FsError::Metadata {
            path: path.to_path_buf(),
            source,
        })
}

/// List the entries of a directory as full paths, sorted by name.
///
/// # Errors
///
/// Returns `FsError::ReadDir` if the directory cannot be read.
pub fn list_dir(path: &Path) -> Result<Vec<PathBuf>, FsError> {
    let read_dir_err = |source: std::io::Error| FsError::ReadDir {
        path: path.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(path)
        .map_err(read_dir_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_dir_err)?;
    entries.sort();
    Ok(entries)
}

/// Create a directory and all of its missing parents.
///
/// # Errors
///
/// Returns `FsError::MakeDir` if the directory cannot be created.
pub fn make_dir(path: &Path) -> Result<(), FsError> {
    tracing::debug!(path = %path.display(), "Making directory");
    fs::create_dir_all(path).map_err(|source| FsError::MakeDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a UTF-8 file into a string.
///
/// # Errors
///
/// Returns `FsError::Read` if the file cannot be read.
pub fn read_file(path: &Path) -> Result<String, FsError> {
    tracing::debug!(path = %path.display(), "Reading file");
    fs::read_to_string(path).map_err(|source| FsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a string to a file, replacing any existing contents.
///
/// # Errors
///
/// Returns `FsError::Write` if the file cannot be written.
pub fn write_file(path: &Path, contents: &str) -> Result<(), FsError> {
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Writing file");
    fs::write(path, contents).map_err(|source| FsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Create an empty file if it does not exist yet.
///
/// Existing files are left untouched.
///
/// # Errors
///
/// Returns an error if the existence check or the write fails.
pub fn touch(path: &Path) -> Result<(), FsError> {
    if path_exists(path)? {
        return Ok(());
    }
    write_file(path, "")
}
