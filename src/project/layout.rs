//! Where everything lives on disk.

use std::path::{Path, PathBuf};

use crate::config::{Config, SaveSlot};

use super::ProjectError;

/// Directory inside the project holding the mod's static files and the
/// compiled script.
pub const MOD_SOURCE_DIR: &str = "mod";

/// The compiled entry point, relative to the mod source directory.
pub const MAIN_LUA: &str = "main.lua";

/// Name of the companion mod that relays messages inside the game.
pub const WATCHER_MOD_NAME: &str = "isaacscript-watcher";

/// Marker file the game writes into a mod directory when the mod is disabled.
pub const DISABLE_IT_FILE: &str = "disable.it";

/// Resolved paths for one project and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Project root (the directory holding `isaacscript.json`).
    pub project_root: PathBuf,
    /// Directory name used for the mod inside the mods directory.
    pub mod_name: String,
    /// `<root>/mod`.
    pub mod_source_dir: PathBuf,
    /// `<modsDirectory>/<mod_name>`.
    pub mod_target_dir: PathBuf,
    /// Bundled copy of the companion mod shipped next to the CLI.
    pub watcher_mod_source_dir: PathBuf,
    /// `<modsDirectory>/isaacscript-watcher`.
    pub watcher_mod_target_dir: PathBuf,
    /// Data directory the game uses for the companion mod's save files.
    pub watcher_data_dir: PathBuf,
    /// Save slot whose data file carries notifications.
    pub save_slot: SaveSlot,
}

impl ProjectLayout {
    /// Resolve the layout for a project root and a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NoProjectName` if the root has no final path
    /// component (for example `/`).
    pub fn new(
        project_root: &Path,
        config: &Config,
        watcher_mod_source_dir: PathBuf,
    ) -> Result<Self, ProjectError> {
        let project_name = project_root
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ProjectError::NoProjectName(project_root.to_path_buf()))?;
        let mod_name = config.target_mod_directory_name(project_name);
        let mods_dir = &config.mods_directory;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            mod_source_dir: project_root.join(MOD_SOURCE_DIR),
            mod_target_dir: mods_dir.join(&mod_name),
            mod_name,
            watcher_mod_source_dir,
            watcher_mod_target_dir: mods_dir.join(WATCHER_MOD_NAME),
            watcher_data_dir: watcher_data_dir(mods_dir),
            save_slot: config.save_slot,
        })
    }

    /// Path of the `save<slot>.dat` file for a given slot.
    #[must_use]
    pub fn save_dat_path(&self, slot: SaveSlot) -> PathBuf {
        self.watcher_data_dir.join(format!("save{slot}.dat"))
    }

    /// Path of the `save<slot>.dat` file for the configured slot.
    #[must_use]
    pub fn notification_path(&self) -> PathBuf {
        self.save_dat_path(self.save_slot)
    }
}

/// The game keeps `mods` and `data` side by side, and each mod's save files
/// in `data/<mod name>`.
#[must_use]
pub fn watcher_data_dir(mods_directory: &Path) -> PathBuf {
    mods_directory
        .parent()
        .unwrap_or(mods_directory)
        .join("data")
        .join(WATCHER_MOD_NAME)
}

/// Default location of the bundled companion mod: next to the executable.
#[must_use]
pub fn default_watcher_mod_source_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(WATCHER_MOD_NAME)
}
