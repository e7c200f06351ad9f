//! Generation of the platform sync script.
//!
//! The script propagates the version in `package.json` into the iOS
//! `Info.plist` and the Android `build.gradle`. It is templated once with
//! the two file locations the user supplied and invoked with no arguments
//! afterwards.

use crate::error::StepError;
use crate::project;
use std::path::Path;
use tokio::fs;

/// Template for the generated sync script.
const SYNC_TEMPLATE: &str = r#"#!/bin/sh
# Generated by rnrelease. Propagates the package.json version into the
# platform project files.
set -e

VERSION=$(node -p "require('./package.json').version")

/usr/libexec/PlistBuddy -c "Set :CFBundleShortVersionString $VERSION" "{{INFO_PLIST}}"

sed -i.bak "s/versionName \".*\"/versionName \"$VERSION\"/" "{{BUILD_GRADLE}}"
rm -f "{{BUILD_GRADLE}}.bak"

echo "Synced version $VERSION"
"#;

const TOKEN_PLIST: &str = "{{INFO_PLIST}}";
const TOKEN_GRADLE: &str = "{{BUILD_GRADLE}}";

/// Render the sync script body with the two collected file locations.
///
/// A token left behind after substitution means the template and the
/// substitution map drifted apart, which is fatal.
pub fn render_sync_script(ios_plist: &str, android_gradle: &str) -> Result<String, StepError> {
    let body = SYNC_TEMPLATE
        .replace(TOKEN_PLIST, ios_plist)
        .replace(TOKEN_GRADLE, android_gradle);

    if let Some(start) = body.find("{{") {
        let token = body[start..]
            .split_inclusive("}}")
            .next()
            .unwrap_or("{{")
            .to_string();
        return Err(StepError::Template { token });
    }

    Ok(body)
}

/// Render the sync script and write it, executable, into the config
/// directory.
pub async fn write_sync_script(
    root: &Path,
    ios_plist: &str,
    android_gradle: &str,
) -> Result<(), StepError> {
    let body = render_sync_script(ios_plist, android_gradle)?;
    let path = project::sync_script_path(root);

    fs::write(&path, body)
        .await
        .map_err(|source| StepError::ScriptWrite {
            path: path.clone(),
            source,
        })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .await
            .map_err(|source| StepError::ScriptWrite { path, source })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn render_interpolates_both_locations() {
        let body = render_sync_script("/a/Info.plist", "/b/build.gradle").unwrap();

        assert!(body.starts_with("#!/bin/sh"));
        assert!(body.contains(r#""/a/Info.plist""#));
        assert!(body.contains(r#""/b/build.gradle""#));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn written_script_is_executable_and_holds_the_paths() {
        let root = TempDir::new().unwrap();
        project::ensure_config_dir(root.path()).await.unwrap();

        write_sync_script(root.path(), "/ios/App/Info.plist", "/android/app/build.gradle")
            .await
            .unwrap();

        let path = project::sync_script_path(root.path());
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("/ios/App/Info.plist"));
        assert!(body.contains("/android/app/build.gradle"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o755, 0o755);
        }
    }

    #[tokio::test]
    async fn write_fails_without_config_dir() {
        let root = TempDir::new().unwrap();

        let err = write_sync_script(root.path(), "/a", "/b").await.unwrap_err();
        assert!(matches!(err, StepError::ScriptWrite { .. }));
    }
}
