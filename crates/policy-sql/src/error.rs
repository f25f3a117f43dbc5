//! Error types for policy clause parsing.

use thiserror::Error;

/// Errors that can occur while parsing a policy clause.
///
/// Malformed input (unbalanced parentheses, a missing `WHERE` keyword) is
/// deliberately not represented here: such text degrades to a single leaf
/// condition or an empty clause instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// Parenthesis nesting exceeds the configured limit.
    #[error("parenthesis nesting depth {depth} exceeds limit {limit}")]
    NestingTooDeep {
        /// Deepest nesting level found in the clause.
        depth: usize,
        /// Configured maximum.
        limit: usize,
    },
}

/// Result type for clause parsing operations.
pub type SqlResult<T> = std::result::Result<T, SqlError>;
