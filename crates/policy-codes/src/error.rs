//! Error types for code dictionary loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a code dictionary.
#[derive(Error, Debug)]
pub enum CodeError {
    /// The dictionary file does not exist.
    #[error("Code dictionary not found: {}", .0.display())]
    DictionaryNotFound(PathBuf),

    /// The dictionary file exists but could not be read.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The dictionary is not valid JSON.
    #[error("Invalid dictionary JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The dictionary root is not a JSON object keyed by code type.
    #[error("Code dictionary root must be an object keyed by code type")]
    NotAnObject,
}

impl CodeError {
    /// Creates an I/O error with path context, mapping `NotFound` to
    /// [`CodeError::DictionaryNotFound`].
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::DictionaryNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

/// Result type for code dictionary operations.
pub type CodeResult<T> = std::result::Result<T, CodeError>;
