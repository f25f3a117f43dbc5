//! Indexed code resolution: exact lookup first, then ordered range scan.

use std::collections::HashMap;

use crate::dictionary::CodeDictionary;
use crate::entry::{CodeEntry, SourceKey};
use crate::traits::CodeResolver;

/// How a token matched the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Matched an exact code key.
    Exact,
    /// Matched a `START-END` range key.
    Range,
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    code_type: String,
    description: String,
    source_key: String,
}

#[derive(Debug, Clone)]
struct RangeEntry {
    key: SourceKey,
    entry: IndexedEntry,
}

/// Code resolver built once from a [`CodeDictionary`].
///
/// Exact keys are indexed by their upper-cased form; a later duplicate
/// overwrites an earlier one. Range keys are kept in declaration order and
/// scanned only when the exact lookup misses; the first matching range wins.
///
/// # Example
///
/// ```rust
/// use policy_codes::{CodeDictionary, CodeIndex, CodeResolver};
///
/// let dictionary = CodeDictionary::new()
///     .with_entry("CPT", "43644", "Gastric bypass")
///     .with_entry("ICD10_Diagnosis", "E08-E13", "Diabetes mellitus");
/// let index = CodeIndex::new(&dictionary);
///
/// let hit = index.resolve("e10").unwrap();
/// assert_eq!(hit.code, "E10");
/// assert_eq!(hit.source_key, "E08-E13");
/// assert!(index.resolve("E14").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    exact: HashMap<String, IndexedEntry>,
    ranges: Vec<RangeEntry>,
}

impl CodeIndex {
    /// Builds the index from a dictionary.
    pub fn new(dictionary: &CodeDictionary) -> Self {
        let mut index = Self::default();
        for entry in dictionary {
            let indexed = IndexedEntry {
                code_type: entry.code_type.clone(),
                description: entry.description.clone(),
                source_key: entry.key.clone(),
            };
            match entry.source_key() {
                key @ SourceKey::Range { .. } => index.ranges.push(RangeEntry {
                    key,
                    entry: indexed,
                }),
                SourceKey::Exact(code) => {
                    index.exact.insert(code.to_uppercase(), indexed);
                }
            }
        }
        tracing::debug!(
            exact = index.exact.len(),
            ranges = index.ranges.len(),
            "built code index"
        );
        index
    }

    /// Number of distinct exact codes.
    pub fn exact_count(&self) -> usize {
        self.exact.len()
    }

    /// Number of range entries.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if the index holds no codes at all.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.ranges.is_empty()
    }

    /// Resolves a token, reporting whether it hit an exact code or a range.
    pub fn resolve_with_kind(&self, token: &str) -> Option<(CodeEntry, MatchKind)> {
        let token = token.to_uppercase();

        if let Some(entry) = self.exact.get(&token) {
            return Some((to_code_entry(token, entry), MatchKind::Exact));
        }

        self.ranges
            .iter()
            .find(|range| range.key.matches(&token))
            .map(|range| (to_code_entry(token, &range.entry), MatchKind::Range))
    }
}

impl CodeResolver for CodeIndex {
    fn resolve(&self, token: &str) -> Option<CodeEntry> {
        self.resolve_with_kind(token).map(|(entry, _)| entry)
    }
}

impl From<&CodeDictionary> for CodeIndex {
    fn from(dictionary: &CodeDictionary) -> Self {
        Self::new(dictionary)
    }
}

fn to_code_entry(code: String, entry: &IndexedEntry) -> CodeEntry {
    CodeEntry {
        code,
        code_type: entry.code_type.clone(),
        description: entry.description.clone(),
        source_key: entry.source_key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> CodeIndex {
        let dictionary = CodeDictionary::new()
            .with_entry("CPT", "43644", "Gastric bypass")
            .with_entry("ICD10_Diagnosis", "E66.01", "Morbid obesity")
            .with_entry("ICD10_Diagnosis", "E08-E13", "Diabetes mellitus")
            .with_entry("ICD10_Diagnosis", "E10-E11", "Shadowed range")
            .with_entry("Misc", "-1", "Negative sentinel");
        CodeIndex::new(&dictionary)
    }

    #[test]
    fn test_counts() {
        let index = sample_index();
        assert_eq!(index.exact_count(), 3);
        assert_eq!(index.range_count(), 2);
        assert!(!index.is_empty());
        assert!(CodeIndex::default().is_empty());
    }

    #[test]
    fn test_exact_lookup_uppercases() {
        let index = sample_index();
        let (entry, kind) = index.resolve_with_kind("e66.01").unwrap();
        assert_eq!(kind, MatchKind::Exact);
        assert_eq!(entry.code, "E66.01");
        assert_eq!(entry.code_type, "ICD10_Diagnosis");
        assert_eq!(entry.source_key, "E66.01");
    }

    #[test]
    fn test_leading_dash_is_exact() {
        let index = sample_index();
        let (entry, kind) = index.resolve_with_kind("-1").unwrap();
        assert_eq!(kind, MatchKind::Exact);
        assert_eq!(entry.description, "Negative sentinel");
    }

    #[test]
    fn test_range_lookup() {
        let index = sample_index();
        for token in ["E08", "E10", "E13"] {
            let (entry, kind) = index.resolve_with_kind(token).unwrap();
            assert_eq!(kind, MatchKind::Range);
            assert_eq!(entry.code, token);
            assert_eq!(entry.source_key, "E08-E13");
        }
        assert!(index.resolve("E14").is_none());
        assert!(index.resolve("D10").is_none());
    }

    #[test]
    fn test_first_range_wins() {
        let index = sample_index();
        let entry = index.resolve("E11").unwrap();
        assert_eq!(entry.description, "Diabetes mellitus");
    }

    #[test]
    fn test_exact_beats_range() {
        let dictionary = CodeDictionary::new()
            .with_entry("ICD10_Diagnosis", "E08-E13", "Diabetes mellitus")
            .with_entry("ICD10_Custom", "E10", "Type 1 diabetes");
        let index = CodeIndex::new(&dictionary);
        let entry = index.resolve("E10").unwrap();
        assert_eq!(entry.code_type, "ICD10_Custom");
    }

    #[test]
    fn test_later_exact_duplicate_overwrites() {
        let dictionary = CodeDictionary::new()
            .with_entry("A", "100", "first")
            .with_entry("B", "100", "second");
        let index = CodeIndex::from(&dictionary);
        assert_eq!(index.resolve("100").unwrap().code_type, "B");
    }

    #[test]
    fn test_unknown_token() {
        assert!(sample_index().resolve("99999").is_none());
        assert!(sample_index().resolve("true").is_none());
    }
}
