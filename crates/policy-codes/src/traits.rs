//! Traits for resolving policy literals to medical codes.
//!
//! The graph generator only needs one capability from a code source: given
//! a literal token from a leaf condition, return the matching code entry.
//! [`CodeIndex`](crate::CodeIndex) implements it over a
//! [`CodeDictionary`](crate::CodeDictionary); other sources (a terminology
//! server, a database table) can implement it in the consuming crate.
//!
//! # Example: a fixed lookup table
//!
//! ```rust
//! use policy_codes::{CodeEntry, CodeResolver};
//! use std::collections::HashMap;
//!
//! struct StaticCodes(HashMap<String, String>);
//!
//! impl CodeResolver for StaticCodes {
//!     fn resolve(&self, token: &str) -> Option<CodeEntry> {
//!         let token = token.to_uppercase();
//!         let description = self.0.get(&token)?;
//!         Some(CodeEntry::new(token.clone(), "CPT", description.clone(), token))
//!     }
//! }
//!
//! let codes = StaticCodes(HashMap::from([("43644".to_string(), "Gastric bypass".to_string())]));
//! assert!(codes.resolve("43644").is_some());
//! assert!(codes.resolve("99999").is_none());
//! ```

use crate::entry::CodeEntry;

/// Trait for code sources that can resolve literal tokens.
pub trait CodeResolver {
    /// Resolves a literal token to a code entry.
    ///
    /// Returns `None` when the token is not a known code. Most literals in a
    /// policy (`'true'`, `'Y'`) are not codes, so `None` is the common case
    /// and not an error.
    fn resolve(&self, token: &str) -> Option<CodeEntry>;
}

impl<T: CodeResolver + ?Sized> CodeResolver for &T {
    fn resolve(&self, token: &str) -> Option<CodeEntry> {
        (**self).resolve(token)
    }
}

/// Returns true if a literal token is worth looking up: it contains at
/// least one digit.
///
/// ```rust
/// use policy_codes::looks_like_code;
///
/// assert!(looks_like_code("E66.01"));
/// assert!(!looks_like_code("TRUE"));
/// ```
pub fn looks_like_code(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CodeResolver for Echo {
        fn resolve(&self, token: &str) -> Option<CodeEntry> {
            Some(CodeEntry::new(token, "ECHO", "echo", token))
        }
    }

    #[test]
    fn test_reference_forwards() {
        let echo = Echo;
        let by_ref: &dyn CodeResolver = &echo;
        assert_eq!(by_ref.resolve("A1").unwrap().code, "A1");
        assert_eq!((&echo).resolve("B2").unwrap().code_type, "ECHO");
    }

    #[test]
    fn test_looks_like_code() {
        assert!(looks_like_code("43644"));
        assert!(looks_like_code("Z68.41"));
        assert!(!looks_like_code("Y"));
        assert!(!looks_like_code(""));
    }
}
