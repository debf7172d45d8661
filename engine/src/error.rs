//! Error types for loading `.envx` files.
//!
//! Wraps pipeline failures ([`EnvxError`]) together with the I/O and
//! serialization failures that only occur around the pipeline: reading
//! input files, loading user configuration and rendering output.

use std::path::PathBuf;

use envx_core::EnvxError;
use thiserror::Error;

/// Errors that can occur while loading or rendering envx data.
#[derive(Debug, Error)]
pub enum Error {
    /// Parse, resolve or validation failure.
    #[error(transparent)]
    Envx(#[from] EnvxError),

    /// Input file does not exist.
    #[error("the specified file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl Error {
    /// Returns the pipeline error, if this is one.
    pub fn as_envx(&self) -> Option<&EnvxError> {
        match self {
            Self::Envx(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
