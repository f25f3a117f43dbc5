//! Code dictionary model and JSON loading.
//!
//! A dictionary maps a coding system name to its codes and code ranges:
//!
//! ```json
//! {
//!   "ICD10_Diagnosis": { "E66.01": "Morbid obesity", "E08-E13": "Diabetes mellitus" },
//!   "CPT": { "43644": "Laparoscopic gastric bypass" }
//! }
//! ```
//!
//! Declaration order is preserved because range lookup is first-match.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::entry::SourceKey;
use crate::error::{CodeError, CodeResult};

/// One `code_type → key → description` triple from a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Coding system name.
    pub code_type: String,
    /// Exact code or `START-END` range as written in the dictionary.
    pub key: String,
    /// Human-readable description.
    pub description: String,
}

impl DictionaryEntry {
    /// Classifies the key as exact or range.
    pub fn source_key(&self) -> SourceKey {
        SourceKey::parse(&self.key)
    }
}

/// An ordered medical code dictionary.
///
/// # Example
///
/// ```rust
/// use policy_codes::CodeDictionary;
///
/// let dictionary = CodeDictionary::from_json_str(
///     r#"{"CPT": {"43644": "Gastric bypass"}, "ICD10_Diagnosis": {"E08-E13": "Diabetes"}}"#,
/// ).unwrap();
/// assert_eq!(dictionary.len(), 2);
/// assert_eq!(dictionary.code_types(), vec!["CPT", "ICD10_Diagnosis"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeDictionary {
    entries: Vec<DictionaryEntry>,
}

impl CodeDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, returning the dictionary for chaining.
    pub fn with_entry(
        mut self,
        code_type: impl Into<String>,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.insert(code_type, key, description);
        self
    }

    /// Appends an entry.
    pub fn insert(
        &mut self,
        code_type: impl Into<String>,
        key: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.entries.push(DictionaryEntry {
            code_type: code_type.into(),
            key: key.into(),
            description: description.into(),
        });
    }

    /// Loads a dictionary from a JSON file.
    ///
    /// A missing file is reported as [`CodeError::DictionaryNotFound`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> CodeResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CodeError::io_error(path, e))?;
        let dictionary = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            entries = dictionary.len(),
            "loaded code dictionary"
        );
        Ok(dictionary)
    }

    /// Loads a dictionary from any reader producing JSON.
    pub fn from_reader<R: Read>(reader: R) -> CodeResult<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Loads a dictionary from a JSON string.
    pub fn from_json_str(json: &str) -> CodeResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Builds a dictionary from a parsed JSON value.
    ///
    /// Code types whose value is not an object are skipped. Descriptions that
    /// are strings, numbers or booleans are kept (non-strings are rendered as
    /// text); other description values are skipped.
    pub fn from_value(value: Value) -> CodeResult<Self> {
        let Value::Object(root) = value else {
            return Err(CodeError::NotAnObject);
        };

        let mut dictionary = Self::new();
        for (code_type, codes) in root {
            let Value::Object(codes) = codes else {
                tracing::warn!(%code_type, "skipping code type whose value is not an object");
                continue;
            };
            dictionary.extend_code_type(&code_type, codes);
        }
        Ok(dictionary)
    }

    fn extend_code_type(&mut self, code_type: &str, codes: Map<String, Value>) {
        for (key, description) in codes {
            let description = match description {
                Value::String(text) => text,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    tracing::warn!(
                        %code_type,
                        %key,
                        kind = value_kind(&other),
                        "skipping code with non-scalar description"
                    );
                    continue;
                }
            };
            self.insert(code_type, key, description);
        }
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    /// Distinct code types in first-seen order.
    pub fn code_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !types.contains(&entry.code_type.as_str()) {
                types.push(&entry.code_type);
            }
        }
        types
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a CodeDictionary {
    type Item = &'a DictionaryEntry;
    type IntoIter = std::slice::Iter<'a, DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_declaration_order() {
        let dictionary = CodeDictionary::from_json_str(
            r#"{"Z": {"Z99": "z", "A00-A09": "a"}, "A": {"10": "ten"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = dictionary.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Z99", "A00-A09", "10"]);
        assert_eq!(dictionary.code_types(), vec!["Z", "A"]);
    }

    #[test]
    fn test_skips_malformed_code_types() {
        let dictionary = CodeDictionary::from_json_str(
            r#"{"CPT": {"43644": "Gastric bypass"}, "notes": "free text", "list": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.entries()[0].code_type, "CPT");
    }

    #[test]
    fn test_description_kinds() {
        let dictionary = CodeDictionary::from_json_str(
            r#"{"T": {"1": "text", "2": 42, "3": true, "4": null, "5": {"nested": 1}}}"#,
        )
        .unwrap();
        let descriptions: Vec<&str> = dictionary.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["text", "42", "true"]);
    }

    #[test]
    fn test_root_must_be_object() {
        let err = CodeDictionary::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, CodeError::NotAnObject));
    }

    #[test]
    fn test_invalid_json() {
        let err = CodeDictionary::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CodeError::InvalidJson(_)));
    }

    #[test]
    fn test_builder_entries() {
        let dictionary = CodeDictionary::new()
            .with_entry("CPT", "43644", "Gastric bypass")
            .with_entry("ICD10_Diagnosis", "E08-E13", "Diabetes mellitus");
        assert_eq!(dictionary.len(), 2);
        assert!(dictionary.entries()[1].source_key().is_range());
    }

    #[test]
    fn test_from_reader() {
        let json = br#"{"CPT": {"43775": "Sleeve gastrectomy"}}"#;
        let dictionary = CodeDictionary::from_reader(&json[..]).unwrap();
        assert_eq!(dictionary.entries()[0].description, "Sleeve gastrectomy");
    }
}
