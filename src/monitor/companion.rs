//! Companion mod installation.

use std::path::Path;

use crate::config::SaveSlot;
use crate::file;
use crate::project::{ProjectLayout, DISABLE_IT_FILE};

use super::error::MonitorError;

/// Install a fresh copy of the companion mod and make sure its data files
/// exist.
///
/// The installed copy is deleted and recopied on every run. If the game had
/// disabled it (by leaving a `disable.it` marker), the marker is put back.
///
/// # Errors
///
/// Returns `MonitorError::CompanionModMissing` if the bundled copy is absent,
/// or any filesystem error.
pub fn prepare_companion_mod(layout: &ProjectLayout) -> Result<(), MonitorError> {
    let source = &layout.watcher_mod_source_dir;
    let target = &layout.watcher_mod_target_dir;

    if !file::path_exists(source)? {
        return Err(MonitorError::CompanionModMissing(source.clone()));
    }

    let marker = target.join(DISABLE_IT_FILE);
    let disabled = file::path_exists(&marker)?;

    if file::path_exists(target)? {
        file::delete_file_or_directory(target)?;
    }
    file::copy(source, target)?;

    if disabled {
        tracing::info!(path = %marker.display(), "Keeping the companion mod disabled");
        file::touch(&marker)?;
    }

    touch_save_dat_files(&layout.watcher_data_dir)?;
    tracing::info!(path = %target.display(), "Installed companion mod");
    Ok(())
}

/// Create `save1.dat` to `save3.dat` in the data directory if they are missing.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be created.
pub fn touch_save_dat_files(data_dir: &Path) -> Result<(), MonitorError> {
    if !file::path_exists(data_dir)? {
        file::make_dir(data_dir)?;
    }
    for slot in SaveSlot::ALL {
        file::touch(&data_dir.join(format!("save{slot}.dat")))?;
    }
    Ok(())
}
