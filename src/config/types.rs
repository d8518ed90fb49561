//! Configuration types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::loader::ConfigError;

/// One of the game's three save slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SaveSlot(u8);

impl SaveSlot {
    /// All valid save slots, in order.
    pub const ALL: [Self; 3] = [Self(1), Self(2), Self(3)];

    /// Create a save slot, returning `None` unless `slot` is 1, 2 or 3.
    #[must_use]
    pub fn new(slot: u8) -> Option<Self> {
        (1..=3).contains(&slot).then_some(Self(slot))
    }

    /// The slot number.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SaveSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("saveSlot must be 1, 2 or 3, got {value}"))
    }
}

impl From<SaveSlot> for u8 {
    fn from(slot: SaveSlot) -> Self {
        slot.0
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contents of `isaacscript.json`.
///
/// `modsDirectory` and `saveSlot` are mandatory; a file missing either of them
/// fails to load instead of being filled in with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Absolute path to the game's `mods` directory.
    pub mods_directory: PathBuf,
    /// Save slot the companion mod reads its messages from.
    pub save_slot: SaveSlot,
    /// Name of the directory inside `mods` to copy the mod to, if it should
    /// differ from the project directory name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_target_mod_directory_name: Option<String>,
    /// Whether the project develops against a local `isaacscript-common`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isaac_script_common_dev: Option<bool>,
}

impl Config {
    /// Create a configuration with only the mandatory fields set.
    #[must_use]
    pub fn new(mods_directory: impl Into<PathBuf>, save_slot: SaveSlot) -> Self {
        Self {
            mods_directory: mods_directory.into(),
            save_slot,
            custom_target_mod_directory_name: None,
            isaac_script_common_dev: None,
        }
    }

    /// Name of the directory inside `mods` that the compiled mod is synced to.
    #[must_use]
    pub fn target_mod_directory_name(&self, project_name: &str) -> String {
        self.custom_target_mod_directory_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(project_name)
            .to_string()
    }

    /// Apply command-line overrides for this invocation.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref dir) = overrides.mods_directory {
            self.mods_directory.clone_from(dir);
        }
        if let Some(slot) = overrides.save_slot {
            self.save_slot = slot;
        }
        if let Some(dev) = overrides.dev {
            self.isaac_script_common_dev = Some(dev);
        }
    }

    /// Check that the mods directory exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ModsDirectoryMissing` or
    /// `ConfigError::ModsDirectoryNotDirectory`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.mods_directory;
        if !path.exists() {
            return Err(ConfigError::ModsDirectoryMissing { path: path.clone() });
        }
        if !path.is_dir() {
            return Err(ConfigError::ModsDirectoryNotDirectory { path: path.clone() });
        }
        Ok(())
    }

    /// Whether the development version of `isaacscript-common` is in use.
    #[must_use]
    pub fn is_common_dev(&self) -> bool {
        self.isaac_script_common_dev.unwrap_or(false)
    }
}

/// Values passed on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub mods_directory: Option<PathBuf>,
    pub save_slot: Option<SaveSlot>,
    pub dev: Option<bool>,
}

impl ConfigOverrides {
    /// Build a configuration from the overrides alone, if they carry every
    /// mandatory field.
    #[must_use]
    pub fn to_config(&self) -> Option<Config> {
        let mods_directory = self.mods_directory.clone()?;
        let save_slot = self.save_slot?;
        let mut config = Config::new(mods_directory, save_slot);
        config.isaac_script_common_dev = self.dev;
        Some(config)
    }
}
