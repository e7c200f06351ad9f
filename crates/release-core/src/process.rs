//! External process execution: the version bump command and the generated
//! sync script.

use crate::error::StepError;
use crate::project;
use crate::version::Increment;
use std::path::Path;
use tokio::process::Command;

/// Program used to apply the selected increment to the manifest.
pub const BUMP_PROGRAM: &str = "npm";

/// Run a command to completion, mapping spawn failures and non-zero exits
/// onto [`StepError`]. Output is captured, not streamed.
async fn run_checked(mut command: Command, label: &str) -> Result<(), StepError> {
    let output = command
        .output()
        .await
        .map_err(|source| StepError::ProcessSpawn {
            command: label.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(StepError::ProcessFailed {
            command: label.to_string(),
            stderr: if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            },
        })
    }
}

/// Apply the selected increment by running `npm version <kind>` in the
/// project root. Only success or failure is inspected.
pub async fn bump_version(root: &Path, increment: Increment) -> Result<(), StepError> {
    let mut command = Command::new(BUMP_PROGRAM);
    command
        .arg("version")
        .arg(increment.as_str())
        .current_dir(root);

    // TODO: parse the captured stdout to confirm the version npm actually
    // produced instead of trusting the exit status alone.
    run_checked(command, &format!("{BUMP_PROGRAM} version {increment}")).await
}

/// Execute the generated sync script from the project root.
pub async fn run_sync_script(root: &Path) -> Result<(), StepError> {
    // current_dir takes effect before the program path is resolved, so a
    // root-relative script path would be looked up twice under the root.
    // Resolve it to an absolute path first.
    let script = project::sync_script_path(root);
    let script = tokio::fs::canonicalize(&script)
        .await
        .map_err(|source| StepError::ProcessSpawn {
            command: script.display().to_string(),
            source,
        })?;
    let mut command = Command::new(&script);
    command.current_dir(root);

    run_checked(command, &script.display().to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn successful_command_passes() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("exit 0");

        run_checked(command, "sh").await.unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_reports_stderr() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("echo boom >&2; exit 3");

        let err = run_checked(command, "sh").await.unwrap_err();
        match err {
            StepError::ProcessFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_failure_still_reports_the_status() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("exit 7");

        let err = run_checked(command, "sh").await.unwrap_err();
        match err {
            StepError::ProcessFailed { stderr, .. } => assert!(stderr.contains("7")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let command = Command::new("definitely-not-a-real-program");

        let err = run_checked(command, "definitely-not-a-real-program")
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::ProcessSpawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn generated_script_runs_from_the_project_root() {
        let root = TempDir::new().unwrap();
        crate::project::ensure_config_dir(root.path()).await.unwrap();

        // A script whose platform commands are stubbed out still proves the
        // invocation path: executable bit, working directory, exit status.
        let path = crate::project::sync_script_path(root.path());
        std::fs::write(&path, "#!/bin/sh\ntest -d .rnrelease\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        run_sync_script(root.path()).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn relative_project_root_still_finds_the_script() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("proj");
        std::fs::create_dir(&root).unwrap();
        crate::project::ensure_config_dir(&root).await.unwrap();

        let path = crate::project::sync_script_path(&root);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        // The working directory moves to the root before the script path
        // is resolved; a relative root must not be applied twice.
        let saved = std::env::current_dir().unwrap();
        std::env::set_current_dir(parent.path()).unwrap();
        let result = run_sync_script(Path::new("proj")).await;
        std::env::set_current_dir(saved).unwrap();

        result.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_script_is_fatal() {
        let root = TempDir::new().unwrap();
        crate::project::ensure_config_dir(root.path()).await.unwrap();
        crate::script::write_sync_script(root.path(), "/nowhere/Info.plist", "/nowhere/build.gradle")
            .await
            .unwrap();

        // The templated script needs node and PlistBuddy; in their absence
        // it must fail loudly, never silently succeed.
        let err = run_sync_script(root.path()).await;
        assert!(err.is_err());
    }
}
