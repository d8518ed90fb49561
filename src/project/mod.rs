//! Project layout and pre-flight project checks.

mod checks;
mod layout;

pub use checks::*;
pub use layout::*;

use std::path::PathBuf;

use crate::file::FsError;

/// Errors that can occur while inspecting the project.
#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    /// The project root has no usable directory name.
    #[error("Failed to determine the project name from: {0}")]
    NoProjectName(PathBuf),

    /// `package.json` is missing.
    #[error("Failed to find \"{0}\". Is this an IsaacScript project?")]
    NoPackageJson(PathBuf),

    /// `package.json` is not valid JSON.
    #[error("Failed to parse \"{path}\": {source}")]
    PackageJsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required dependency is missing from `package.json`.
    #[error(
        "IsaacScript projects require a {kind} of \"{name}\" in the \"package.json\" file. You can add it with: npm install {flag}{name}"
    )]
    MissingDependency {
        name: String,
        kind: &'static str,
        flag: &'static str,
    },

    #[error(transparent)]
    Fs(#[from] FsError),
}
