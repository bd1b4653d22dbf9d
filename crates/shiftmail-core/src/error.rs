//! Error types for the model core.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations and malformed input on the model boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A required argument was absent.
    #[error("{0} must not be null")]
    NullArgument(&'static str),

    /// An argument was present but not acceptable.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
}

/// Failures raised by an I/O layer while reading or writing its backing store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoding error: {0}")]
    Encode(String),

    /// Raised by test doubles and layers that refuse writes.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<postcard::Error> for StorageError {
    fn from(err: postcard::Error) -> Self {
        StorageError::Encode(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encode(err.to_string())
    }
}

/// Top-level error for application construction and mutation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Help display failed: {0}")]
    Help(#[source] std::io::Error),
}

impl Error {
    /// True for contract violations (`NullArgument`).
    pub fn is_null_argument(&self) -> bool {
        matches!(self, Error::Model(ModelError::NullArgument(_)))
    }

    /// True for malformed input (`IllegalArgument`).
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, Error::Model(ModelError::IllegalArgument(_)))
    }
}
