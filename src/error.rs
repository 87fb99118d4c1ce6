//! Error types
//!
//! Game transitions never fail; they report through return values and the
//! game-over flag. Errors only arise at the edges: loading configuration and
//! talking to a session task that has already stopped.

use std::path::PathBuf;

/// Configuration could not be loaded, saved or accepted
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// The session task is no longer running
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("game session has shut down")]
pub struct SessionClosed;
