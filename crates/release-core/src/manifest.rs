//! Project manifest discovery and version extraction.

use crate::error::StepError;
use semver::Version;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Manifest filenames recognized as version sources, in lookup order.
pub const MANIFEST_FILES: &[&str] = &["package.json"];

/// The slice of `package.json` we care about.
#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(rename = "Version", alias = "version")]
    version: String,
}

/// Read the current project version from the first recognized manifest.
///
/// The absence of every recognized manifest is fatal, as is a manifest
/// whose version field is missing or not valid semver.
pub async fn read_project_version(root: &Path) -> Result<Version, StepError> {
    let found = MANIFEST_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file());

    let path = found.ok_or_else(|| StepError::ManifestMissing {
        expected: MANIFEST_FILES.join(", "),
    })?;

    let data = fs::read_to_string(&path)
        .await
        .map_err(|e| StepError::ManifestInvalid {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    let manifest: PackageJson =
        serde_json::from_str(&data).map_err(|e| StepError::ManifestInvalid {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    Version::parse(&manifest.version).map_err(|e| StepError::ManifestInvalid {
        path,
        reason: format!("version {:?} is not valid semver: {}", manifest.version, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, body: &str) {
        std::fs::write(root.join("package.json"), body).unwrap();
    }

    #[tokio::test]
    async fn reads_capitalized_version_field() {
        let root = TempDir::new().unwrap();
        write_manifest(root.path(), r#"{"Version":"1.0.0"}"#);

        let version = read_project_version(root.path()).await.unwrap();
        assert_eq!(version, Version::new(1, 0, 0));
    }

    #[tokio::test]
    async fn reads_lowercase_version_field() {
        let root = TempDir::new().unwrap();
        write_manifest(
            root.path(),
            r#"{"name":"app","version":"2.5.9","private":true}"#,
        );

        let version = read_project_version(root.path()).await.unwrap();
        assert_eq!(version, Version::new(2, 5, 9));
    }

    #[tokio::test]
    async fn missing_manifest_lists_recognized_files() {
        let root = TempDir::new().unwrap();

        let err = read_project_version(root.path()).await.unwrap_err();
        match err {
            StepError::ManifestMissing { expected } => {
                assert!(expected.contains("package.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_data_error() {
        let root = TempDir::new().unwrap();
        write_manifest(root.path(), "not json");

        let err = read_project_version(root.path()).await.unwrap_err();
        assert!(matches!(err, StepError::ManifestInvalid { .. }));
    }

    #[tokio::test]
    async fn non_semver_version_is_a_data_error() {
        let root = TempDir::new().unwrap();
        write_manifest(root.path(), r#"{"version":"not-a-version"}"#);

        let err = read_project_version(root.path()).await.unwrap_err();
        assert!(matches!(err, StepError::ManifestInvalid { .. }));
    }
}
