//! Configuration file loader.

use std::path::{Path, PathBuf};

use crate::file::{self, FsError};

use super::jsonc::strip_jsonc;
use super::types::{Config, ConfigOverrides};

/// Name of the configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = "isaacscript.json";

/// Loads and creates the project's `isaacscript.json`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the config file in the given project root.
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: project_root.join(CONFIG_FILE_NAME),
        }
    }

    /// Path of the config file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// JSON-with-comments, or lacks a mandatory field.
    pub fn load(&self) -> Result<Option<Config>, ConfigError> {
        if !file::path_exists(&self.path)? {
            tracing::debug!(path = %self.path.display(), "No config file found");
            return Ok(None);
        }

        tracing::debug!(path = %self.path.display(), "Loading config file");
        let content = file::read_file(&self.path)?;
        let config =
            serde_json::from_str(&strip_jsonc(&content)).map_err(|e| ConfigError::Parse {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(Some(config))
    }

    /// Write a configuration to the config file.
    ///
    /// The file uses 2-space indentation and ends with a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn create(&self, config: &Config) -> Result<(), ConfigError> {
        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');
        file::write_file(&self.path, &content)?;
        tracing::info!(path = %self.path.display(), "Created config file");
        Ok(())
    }

    /// Load the configuration, apply command-line overrides and validate it.
    ///
    /// If the file does not exist and the overrides carry both mandatory
    /// fields, the file is created from them first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if there is no file and the overrides
    /// are incomplete, or any load, write or validation error.
    pub fn load_with_overrides(&self, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
        let mut config = match self.load()? {
            Some(config) => config,
            None => {
                let config = overrides.to_config().ok_or_else(|| ConfigError::NotFound {
                    path: self.path.clone(),
                })?;
                config.validate()?;
                self.create(&config)?;
                config
            }
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Failed to find the \"{path}\" file. Run again with --mods-directory and --save-slot to create it."
    )]
    NotFound { path: PathBuf },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("The mods directory does not exist: {path}")]
    ModsDirectoryMissing { path: PathBuf },

    #[error("The mods directory is not a directory: {path}")]
    ModsDirectoryNotDirectory { path: PathBuf },
}
