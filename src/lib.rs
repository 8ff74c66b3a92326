//! Print Queue - a file browser for a workshop's print and laser queue
//!
//! Part and laser files are opened with configured applications and then
//! copied into a hidden `.complete` folder so the browser stops showing them.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod tui;

// Re-export primary types for convenience
pub use config::{AppAssociation, ConfigFile, ConfigStore, FormatList};
pub use domain::{
    is_complete, list_directory, mark_complete, Classifier, DirEntry, FileKind, ListOptions,
    Listing, OpenOutcome, Session,
};
pub use error::{QueueError, Result};
pub use launcher::{run_application, Launcher, ShellLauncher};
