use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures raised by a backend process handle.
///
/// These travel inside `errored` events, so they never unwind into the caller that
/// asked for the spawn.
#[derive(Debug, Error)]
pub(crate) enum SupervisorError {
    #[error("failed to spawn backend {}: {source}", .program.display())]
    Spawn { program: PathBuf, source: io::Error },

    #[error("failed to poll backend process {pid}: {source}")]
    Poll { pid: u32, source: io::Error },

    #[error("failed to terminate backend process {pid}: {source}")]
    Terminate { pid: u32, source: io::Error },

    #[error("failed to start backend exit watcher: {0}")]
    Watcher(io::Error),
}

/// Failures of the desktop shell around the supervisor.
#[derive(Debug, Error)]
pub(crate) enum ShellError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to decode tray icon: {0}")]
    Icon(#[from] image::ImageError),

    #[error(transparent)]
    Tauri(#[from] tauri::Error),

    #[error("failed to dispatch {task} to the main thread: {reason}")]
    Dispatch { task: String, reason: String },
}
