//! Integration tests for loading dictionaries from disk and resolving codes.

use std::io::Write;

use policy_codes::{CodeDictionary, CodeError, CodeIndex, CodeResolver, MatchKind};
use tempfile::NamedTempFile;

const BARIATRIC_CODES: &str = r#"{
  "ICD10_Diagnosis": {
    "E66.01": "Morbid (severe) obesity due to excess calories",
    "E66.2": "Morbid obesity with alveolar hypoventilation",
    "E08-E13": "Diabetes mellitus",
    "I10": "Essential (primary) hypertension",
    "G47.33": "Obstructive sleep apnea"
  },
  "CPT": {
    "43644": "Laparoscopic gastric bypass with Roux-en-Y",
    "43645": "Laparoscopic gastric bypass with small intestine reconstruction",
    "43775": "Laparoscopic sleeve gastrectomy"
  },
  "ICD10_Procedure": {
    "0D160ZA-0D16FZB": "Gastric bypass procedure range"
  },
  "metadata": "version 2024"
}"#;

fn write_dictionary(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_path_and_resolve() {
    let file = write_dictionary(BARIATRIC_CODES);
    let dictionary = CodeDictionary::from_path(file.path()).unwrap();

    assert_eq!(dictionary.len(), 9);
    assert_eq!(
        dictionary.code_types(),
        vec!["ICD10_Diagnosis", "CPT", "ICD10_Procedure"]
    );

    let index = CodeIndex::new(&dictionary);
    assert_eq!(index.exact_count(), 7);
    assert_eq!(index.range_count(), 2);

    let gastric = index.resolve("43644").unwrap();
    assert_eq!(gastric.code_type, "CPT");
    assert_eq!(gastric.description, "Laparoscopic gastric bypass with Roux-en-Y");

    let (diabetes, kind) = index.resolve_with_kind("E11").unwrap();
    assert_eq!(kind, MatchKind::Range);
    assert_eq!(diabetes.code, "E11");
    assert_eq!(diabetes.source_key, "E08-E13");

    let procedure = index.resolve("0d16479").unwrap();
    assert_eq!(procedure.code_type, "ICD10_Procedure");
    assert_eq!(procedure.code, "0D16479");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("codes.json");
    let err = CodeDictionary::from_path(&missing).unwrap_err();
    match err {
        CodeError::DictionaryNotFound(path) => assert_eq!(path, missing),
        other => panic!("expected DictionaryNotFound, got {other:?}"),
    }
}

#[test]
fn test_invalid_file_contents() {
    let file = write_dictionary("not json at all");
    let err = CodeDictionary::from_path(file.path()).unwrap_err();
    assert!(matches!(err, CodeError::InvalidJson(_)));
}

#[test]
fn test_non_codes_resolve_to_nothing() {
    let dictionary = CodeDictionary::from_json_str(BARIATRIC_CODES).unwrap();
    let index = CodeIndex::new(&dictionary);
    for token in ["99999", "TRUE", "E14", "D10", "E1", "E66.011"] {
        assert!(index.resolve(token).is_none(), "{token} should not resolve");
    }
}
