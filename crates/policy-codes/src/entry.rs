//! Code entry types.

use serde::{Deserialize, Serialize};

/// A dictionary key: either one exact code or a closed range `START-END`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    /// A single code, e.g. `43644`.
    Exact(String),
    /// A closed lexicographic range, e.g. `E08-E13`.
    Range {
        /// Inclusive lower bound.
        start: String,
        /// Inclusive upper bound.
        end: String,
    },
}

impl SourceKey {
    /// Classifies a dictionary key.
    ///
    /// A key is a range when it contains `-` anywhere but at the start; it
    /// splits at the first `-`. Everything else is exact.
    ///
    /// ```rust
    /// use policy_codes::SourceKey;
    ///
    /// assert_eq!(SourceKey::parse("43644"), SourceKey::Exact("43644".into()));
    /// assert_eq!(
    ///     SourceKey::parse("E08-E13"),
    ///     SourceKey::Range { start: "E08".into(), end: "E13".into() }
    /// );
    /// assert_eq!(SourceKey::parse("-5"), SourceKey::Exact("-5".into()));
    /// ```
    pub fn parse(key: &str) -> Self {
        if key.starts_with('-') {
            return SourceKey::Exact(key.to_string());
        }
        match key.split_once('-') {
            Some((start, end)) => SourceKey::Range {
                start: start.to_string(),
                end: end.to_string(),
            },
            None => SourceKey::Exact(key.to_string()),
        }
    }

    /// Returns true for range keys.
    pub fn is_range(&self) -> bool {
        matches!(self, SourceKey::Range { .. })
    }

    /// Checks whether an already upper-cased token falls inside this key.
    ///
    /// Exact keys compare case-insensitively. Range keys require the token to
    /// have the same length as the range start and to sort between the
    /// upper-cased bounds, inclusive.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            SourceKey::Exact(code) => code.to_uppercase() == token,
            SourceKey::Range { start, end } => {
                if token.chars().count() != start.chars().count() {
                    return false;
                }
                let start = start.to_uppercase();
                let end = end.to_uppercase();
                start.as_str() <= token && token <= end.as_str()
            }
        }
    }
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKey::Exact(code) => f.write_str(code),
            SourceKey::Range { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

/// A resolved medical code.
///
/// `code` is the matched token (upper-cased), `source_key` the dictionary key
/// it matched: the same code for exact hits, the range expression for range
/// hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    /// The code as it appeared in the policy, upper-cased.
    pub code: String,
    /// Coding system name, e.g. `ICD10_Diagnosis` or `CPT`.
    pub code_type: String,
    /// Human-readable description.
    pub description: String,
    /// Dictionary key that produced the match.
    pub source_key: String,
}

impl CodeEntry {
    /// Creates a new code entry.
    pub fn new(
        code: impl Into<String>,
        code_type: impl Into<String>,
        description: impl Into<String>,
        source_key: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            code_type: code_type.into(),
            description: description.into(),
            source_key: source_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_splits_once() {
        assert_eq!(
            SourceKey::parse("A00-B99-X"),
            SourceKey::Range {
                start: "A00".into(),
                end: "B99-X".into()
            }
        );
    }

    #[test]
    fn test_range_matches_inclusive_bounds() {
        let key = SourceKey::parse("E08-E13");
        assert!(key.matches("E08"));
        assert!(key.matches("E10"));
        assert!(key.matches("E13"));
        assert!(!key.matches("E14"));
        assert!(!key.matches("D10"));
    }

    #[test]
    fn test_range_requires_equal_length() {
        let key = SourceKey::parse("E08-E13");
        assert!(!key.matches("E10.9"));
        assert!(!key.matches("E1"));
    }

    #[test]
    fn test_range_bounds_case_insensitive() {
        let key = SourceKey::parse("e08-e13");
        assert!(key.matches("E09"));
    }

    #[test]
    fn test_exact_matches_case_insensitive() {
        assert!(SourceKey::parse("e66.01").matches("E66.01"));
        assert!(!SourceKey::parse("E66.01").matches("E66.0"));
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(SourceKey::parse("E08-E13").to_string(), "E08-E13");
        assert_eq!(SourceKey::parse("43644").to_string(), "43644");
    }
}
