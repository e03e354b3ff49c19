//! Error taxonomy for the wrapper.
//!
//! Only [`LaunchError`] is fatal. Everything else is recovered at the
//! call site with a built-in default and at most a warning in the log.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The wrapped executable could not be found or started.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("'{binary}' was not found on PATH")]
    NotFound { binary: String },

    #[error("'{}' is not an executable file", path.display())]
    NotExecutable { path: PathBuf },

    #[error("Failed to open a pseudo-terminal: {0}")]
    Pty(String),

    #[error("Failed to spawn '{command}': {reason}")]
    Spawn { command: String, reason: String },
}

impl LaunchError {
    /// User-facing message printed before exiting with status 1.
    pub fn user_message(&self) -> String {
        match self {
            LaunchError::NotFound { .. } | LaunchError::NotExecutable { .. } => {
                format!("Pathetic. Install Claude Code first. ({})", self)
            }
            LaunchError::Pty(_) | LaunchError::Spawn { .. } => self.to_string(),
        }
    }
}

/// A static asset (logo, personality, dialogue cache) is missing or malformed.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' contains no usable entries", path.display())]
    Empty { path: PathBuf },
}

/// Querying the wrapped binary for its version or model failed.
#[derive(Debug, Error)]
pub enum VersionProbeError {
    #[error("Failed to run probe: {0}")]
    Spawn(#[from] io::Error),

    #[error("Probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("Probe produced no output")]
    EmptyOutput,

    #[error("Probe exited with code {0}")]
    Failed(i32),
}
