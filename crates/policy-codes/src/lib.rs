//! # policy-codes
//!
//! Medical code dictionaries and literal-to-code resolution for policy
//! rules.
//!
//! Leaf conditions of a policy clause carry quoted literals such as
//! `'43644'` or `'E10'`. This crate decides which of those literals are
//! codes by looking them up in a code dictionary, either as an exact code or
//! inside a closed lexicographic range like `E08-E13`.
//!
//! ## Quick Start
//!
//! ```rust
//! use policy_codes::{CodeDictionary, CodeIndex, CodeResolver};
//!
//! let dictionary = CodeDictionary::from_json_str(r#"{
//!     "CPT": {"43644": "Laparoscopic gastric bypass"},
//!     "ICD10_Diagnosis": {"E08-E13": "Diabetes mellitus"}
//! }"#).unwrap();
//!
//! let index = CodeIndex::new(&dictionary);
//! assert_eq!(index.resolve("43644").unwrap().code_type, "CPT");
//! assert_eq!(index.resolve("E11").unwrap().source_key, "E08-E13");
//! assert!(index.resolve("true").is_none());
//! ```
//!
//! ## Lookup Rules
//!
//! | Key form | Example | Matches |
//! |----------|---------|---------|
//! | Exact | `43644` | the same code, case-insensitive |
//! | Range | `E08-E13` | same-length tokens with `E08 <= token <= E13` |
//! | Leading dash | `-1` | treated as an exact code |
//!
//! Exact keys are consulted first; ranges are scanned in dictionary order
//! and the first match wins.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod dictionary;
mod entry;
mod error;
mod index;
mod traits;

pub use dictionary::{CodeDictionary, DictionaryEntry};
pub use entry::{CodeEntry, SourceKey};
pub use error::{CodeError, CodeResult};
pub use index::{CodeIndex, MatchKind};
pub use traits::{looks_like_code, CodeResolver};
