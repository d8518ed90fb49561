//! Pre-flight checks on `package.json`.

use std::path::Path;

use serde_json::Value;

use crate::file;

use super::ProjectError;

/// Dependencies every mod project must declare.
pub const REQUIRED_DEPENDENCIES: &[&str] = &["isaac-typescript-definitions"];

/// Development dependencies every mod project must declare.
///
/// Keeping these out of `dependencies` keeps their functions out of the
/// editor's auto-complete list.
pub const REQUIRED_DEV_DEPENDENCIES: &[&str] = &["isaacscript", "typescript", "typescript-to-lua"];

/// Verify that `package.json` declares the dependencies the toolchain needs.
///
/// # Errors
///
/// Returns an error naming the first missing dependency, or if the file is
/// missing or malformed.
pub fn check_package_json(project_root: &Path) -> Result<(), ProjectError> {
    let path = project_root.join("package.json");
    if !file::path_exists(&path)? {
        return Err(ProjectError::NoPackageJson(path));
    }

    let content = file::read_file(&path)?;
    let package_json: Value =
        serde_json::from_str(&content).map_err(|source| ProjectError::PackageJsonParse {
            path: path.clone(),
            source,
        })?;

    check_section(&package_json, "dependencies", REQUIRED_DEPENDENCIES, "dependency", "")?;
    check_section(
        &package_json,
        "devDependencies",
        REQUIRED_DEV_DEPENDENCIES,
        "development dependency",
        "--save-dev ",
    )?;

    tracing::debug!(path = %path.display(), "package.json dependencies look good");
    Ok(())
}

fn check_section(
    package_json: &Value,
    section: &str,
    required: &[&str],
    kind: &'static str,
    flag: &'static str,
) -> Result<(), ProjectError> {
    let declared = package_json.get(section).and_then(Value::as_object);
    for name in required {
        if !declared.is_some_and(|deps| deps.contains_key(*name)) {
            return Err(ProjectError::MissingDependency {
                name: (*name).to_string(),
                kind,
                flag,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "name": "my-mod",
        "dependencies": { "isaac-typescript-definitions": "^1.0.0" },
        "devDependencies": {
            "isaacscript": "^3.0.0",
            "typescript": "^5.0.0",
            "typescript-to-lua": "^1.0.0"
        }
    }"#;

    #[test]
    fn test_valid_package_json() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("package.json"), VALID).unwrap();
        assert!(check_package_json(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_missing_package_json() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            check_package_json(temp_dir.path()),
            Err(ProjectError::NoPackageJson(_))
        ));
    }

    #[test]
    fn test_malformed_package_json() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("package.json"), "{").unwrap();
        assert!(matches!(
            check_package_json(temp_dir.path()),
            Err(ProjectError::PackageJsonParse { .. })
        ));
    }

    #[test]
    fn test_missing_dev_dependency_named() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("package.json"),
            r#"{
                "dependencies": { "isaac-typescript-definitions": "1" },
                "devDependencies": { "isaacscript": "1", "typescript": "1" }
            }"#,
        )
        .unwrap();

        let err = check_package_json(temp_dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("development dependency of \"typescript-to-lua\""));
        assert!(message.contains("npm install --save-dev typescript-to-lua"));
    }

    #[test]
    fn test_dev_dependency_in_wrong_section_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "dependencies": { "isaacscript": "1" } }"#,
        )
        .unwrap();

        let err = check_package_json(temp_dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::MissingDependency { ref name, .. } if name == "isaac-typescript-definitions"
        ));
    }
}
