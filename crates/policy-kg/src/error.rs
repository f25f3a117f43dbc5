//! Error types for knowledge graph generation.

use std::path::PathBuf;

/// Result type for knowledge graph operations.
pub type KgResult<T> = Result<T, KgError>;

/// Errors that can occur while generating or persisting a knowledge graph.
#[derive(Debug, thiserror::Error)]
pub enum KgError {
    /// Clause parsing error.
    #[error("Clause parse error: {0}")]
    Parse(#[from] policy_sql::SqlError),

    /// Code dictionary error.
    #[error("Code dictionary error: {0}")]
    Codes(#[from] policy_codes::CodeError),

    /// The policy SQL file does not exist.
    #[error("SQL file not found: {}", .0.display())]
    SqlFileNotFound(PathBuf),

    /// I/O error while reading or writing graph files.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KgError {
    /// Creates an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
