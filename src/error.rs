// src/error.rs
//! Error types for the crawldb library

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("failed to decode record: {0}")]
    Decode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("corrupt store '{path}': {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("no current generation under '{0}'")]
    MissingGeneration(PathBuf),

    #[error("key '{key}' appended out of order (previous key was '{previous}')")]
    OutOfOrderKey { key: String, previous: String },

    #[error("database '{0}' is locked by another process")]
    Locked(PathBuf),
}

impl Error {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
