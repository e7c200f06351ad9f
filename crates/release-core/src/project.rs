//! Project layout constants and config directory handling.

use crate::error::StepError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory created next to the project manifest to hold generated files.
pub const CONFIG_DIR: &str = ".rnrelease";

/// Name of the generated platform sync script inside [`CONFIG_DIR`].
pub const SYNC_SCRIPT_NAME: &str = "sync_version.sh";

/// Path of the config directory for a project root.
pub fn config_dir(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR)
}

/// Path of the sync script for a project root.
pub fn sync_script_path(root: &Path) -> PathBuf {
    config_dir(root).join(SYNC_SCRIPT_NAME)
}

/// Create the config directory if it does not exist yet.
///
/// Creating an already-existing directory is a success; any other I/O
/// failure is fatal.
pub async fn ensure_config_dir(root: &Path) -> Result<(), StepError> {
    let path = config_dir(root);
    fs::create_dir_all(&path)
        .await
        .map_err(|source| StepError::Setup { path, source })
}

/// Check whether the sync script already exists in the config directory.
///
/// The directory is listed and scanned for the known script filename, so a
/// missing config directory is a setup error rather than a plain "absent".
pub async fn sync_script_exists(root: &Path) -> Result<bool, StepError> {
    let dir = config_dir(root);
    let mut entries = fs::read_dir(&dir)
        .await
        .map_err(|source| StepError::Setup {
            path: dir.clone(),
            source,
        })?;

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                if entry.file_name() == SYNC_SCRIPT_NAME {
                    return Ok(true);
                }
            }
            Ok(None) => return Ok(false),
            Err(source) => {
                return Err(StepError::Setup {
                    path: dir,
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn create_config_dir_is_idempotent() {
        let root = TempDir::new().unwrap();

        ensure_config_dir(root.path()).await.unwrap();
        assert!(config_dir(root.path()).is_dir());

        // Second call must succeed on the existing directory
        ensure_config_dir(root.path()).await.unwrap();
    }

    #[tokio::test]
    async fn script_absent_in_fresh_config_dir() {
        let root = TempDir::new().unwrap();
        ensure_config_dir(root.path()).await.unwrap();

        assert!(!sync_script_exists(root.path()).await.unwrap());
    }

    #[tokio::test]
    async fn script_found_when_present() {
        let root = TempDir::new().unwrap();
        ensure_config_dir(root.path()).await.unwrap();
        std::fs::write(sync_script_path(root.path()), "#!/bin/sh\n").unwrap();

        assert!(sync_script_exists(root.path()).await.unwrap());
    }

    #[tokio::test]
    async fn listing_missing_config_dir_is_a_setup_error() {
        let root = TempDir::new().unwrap();

        let err = sync_script_exists(root.path()).await.unwrap_err();
        assert!(matches!(err, StepError::Setup { .. }));
    }
}
