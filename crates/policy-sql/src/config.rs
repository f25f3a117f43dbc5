//! Parser configuration.

/// Default cap on parenthesis nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling clause parsing.
///
/// # Example
///
/// ```rust
/// use policy_sql::ParseOptions;
///
/// let options = ParseOptions::builder().with_max_depth(32).build();
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    /// Maximum parenthesis nesting depth accepted in a clause.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates a new builder for ParseOptions.
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::default()
    }
}

/// Builder for ParseOptions.
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
    max_depth: Option<usize>,
}

impl ParseOptionsBuilder {
    /// Sets the maximum parenthesis nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Builds the ParseOptions.
    pub fn build(self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_default() {
        assert_eq!(ParseOptions::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(ParseOptions::builder().build(), ParseOptions::default());
    }
}
