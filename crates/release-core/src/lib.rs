//! Release Core - library behind the `rnrelease` binary
//!
//! Guides a developer through bumping a React Native project's semantic
//! version and syncing it into the iOS/Android platform files.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Step operations** - Pure async functions over an explicit project
//!   root: config directory handling, manifest parsing, sync script
//!   generation, external process execution ([`project`], [`manifest`],
//!   [`script`], [`process`], [`version`]).
//! - **Interactive flow** - The single-writer `Session` state machine and
//!   its ratatui rendering, feature-gated behind `tui`.
//!
//! # Feature Flags
//!
//! - `tui` (default): enables the ratatui/crossterm interactive flow.

pub mod error;
pub mod manifest;
pub mod process;
pub mod project;
pub mod script;
pub mod version;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::StepError;
pub use version::Increment;

#[cfg(feature = "tui")]
pub use tui::run;
