//! One-shot compile and copy.

use std::path::PathBuf;

use crate::compiler::{run_once, CompilerProcessBuilder};
use crate::config::{ConfigLoader, ConfigOverrides};
use crate::display;
use crate::file;
use crate::project::{default_watcher_mod_source_dir, ProjectLayout};

use super::error::MonitorError;

/// Settings for the `copy` command.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    pub project_root: PathBuf,
    /// Compiler command. Watch mode is always off.
    pub compiler: CompilerProcessBuilder,
    pub echo: bool,
}

impl CopyOptions {
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            compiler: CompilerProcessBuilder::default(),
            echo: true,
        }
    }
}

/// Compile the mod once, then replace the installed copy with a fresh one.
///
/// Nothing is copied unless the compiler exits with status 0.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the compiler
/// fails, or the copy fails.
pub async fn copy_mod(options: &CopyOptions) -> Result<ProjectLayout, MonitorError> {
    let loader = ConfigLoader::new(&options.project_root);
    let config = loader.load_with_overrides(&ConfigOverrides::default())?;
    let layout = ProjectLayout::new(
        &options.project_root,
        &config,
        default_watcher_mod_source_dir(),
    )?;

    let builder = options
        .compiler
        .clone()
        .watch(false)
        .working_dir(&options.project_root);
    run_once(&builder).await?;

    if file::path_exists(&layout.mod_target_dir)? {
        file::delete_file_or_directory(&layout.mod_target_dir)?;
    }
    file::copy(&layout.mod_source_dir, &layout.mod_target_dir)?;

    tracing::info!(
        source = %layout.mod_source_dir.display(),
        target = %layout.mod_target_dir.display(),
        "Copied mod"
    );
    if options.echo {
        display::print_success(&format!(
            "Compiled and copied the mod to: {}",
            layout.mod_target_dir.display()
        ));
    }
    Ok(layout)
}
