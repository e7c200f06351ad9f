//! Fatal error type shared by all step functions.
//!
//! Every failure a step can hit aborts the whole flow; there is no retry
//! and no rollback. A partially written sync script is left in place.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a step function. Always fatal.
#[derive(Debug, Error)]
pub enum StepError {
    /// Config directory could not be created or listed.
    #[error("could not access config directory {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// None of the recognized manifest files exist in the project.
    #[error("no versioning file found, please add one of the following: {expected}")]
    ManifestMissing { expected: String },

    /// A manifest file exists but could not be read or parsed.
    #[error("could not read version from {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    /// The sync script template left a token unreplaced.
    #[error("sync script template still contains token {token}")]
    Template { token: String },

    /// The sync script could not be written or marked executable.
    #[error("could not write sync script {path}: {source}")]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external command could not be launched.
    #[error("could not launch {command}: {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// An external command exited with a non-zero status.
    #[error("{command} failed: {stderr}")]
    ProcessFailed { command: String, stderr: String },
}
