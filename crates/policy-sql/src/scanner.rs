//! Depth- and quote-aware scanning over boolean clause text.
//!
//! Every scanner here walks the token stream of [`crate::lexer`], which
//! already reports each token's parenthesis depth and keeps quoted literals
//! whole. Parentheses and operator keywords inside literals are therefore
//! never seen as structure.

use crate::ast::BooleanOperator;
use crate::lexer::{tokenize, Token, TokenKind};

/// Splits `expression` into its top-level operands for `operator`.
///
/// An occurrence of the keyword counts only at parenthesis depth zero,
/// outside quoted literals, and when bounded on both sides by whitespace, a
/// parenthesis or the ends of the text (so `ANDREW` never splits on `AND`).
/// Matching is case-insensitive. Operands are trimmed and empty operands are
/// dropped. When fewer than two operands remain the trimmed expression is
/// returned as the only element.
///
/// ```rust
/// use policy_sql::{split_top_level, BooleanOperator};
///
/// let parts = split_top_level("a = 1 AND (b = 2 OR c = 3)", BooleanOperator::And);
/// assert_eq!(parts, vec!["a = 1", "(b = 2 OR c = 3)"]);
///
/// let parts = split_top_level("name = 'ANDREW'", BooleanOperator::And);
/// assert_eq!(parts, vec!["name = 'ANDREW'"]);
/// ```
pub fn split_top_level(expression: &str, operator: BooleanOperator) -> Vec<&str> {
    let keyword = operator.keyword();
    let tokens: Vec<Token<'_>> = tokenize(expression).collect();
    let bounded = |index: Option<usize>| {
        index
            .and_then(|i| tokens.get(i))
            .map_or(true, Token::is_boundary)
    };

    let mut parts = Vec::new();
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        if token.depth == 0
            && token.is_keyword(keyword)
            && bounded(index.checked_sub(1))
            && bounded(Some(index + 1))
        {
            let operand = expression[start..token.offset].trim();
            if !operand.is_empty() {
                parts.push(operand);
            }
            start = token.end();
        }
    }

    let operand = expression[start..].trim();
    if !operand.is_empty() {
        parts.push(operand);
    }

    if parts.len() > 1 {
        parts
    } else {
        vec![expression.trim()]
    }
}

/// Removes parentheses that wrap the entire expression, repeatedly.
///
/// A leading `(` and trailing `)` are removed only when the depth returns to
/// zero exactly at the final character. `(a) OR (b)` is left untouched, and
/// unbalanced text is returned trimmed but otherwise unchanged.
///
/// ```rust
/// use policy_sql::strip_enclosing_parens;
///
/// assert_eq!(strip_enclosing_parens("((a = 1))"), "a = 1");
/// assert_eq!(strip_enclosing_parens("(a = 1) OR (b = 2)"), "(a = 1) OR (b = 2)");
/// assert_eq!(strip_enclosing_parens("(a = 1"), "(a = 1");
/// ```
pub fn strip_enclosing_parens(text: &str) -> &str {
    let mut text = text.trim();
    while text.starts_with('(') && text.ends_with(')') && wraps_entirely(text) {
        text = text[1..text.len() - 1].trim();
    }
    text
}

fn wraps_entirely(text: &str) -> bool {
    tokenize(text)
        .find(|t| t.kind == TokenKind::Close && t.depth == 0)
        .map_or(false, |close| close.end() == text.len())
}

/// Deepest parenthesis nesting outside quoted literals.
pub fn max_paren_depth(text: &str) -> usize {
    tokenize(text)
        .filter(|t| t.kind == TokenKind::Open)
        .map(|t| t.depth + 1)
        .max()
        .unwrap_or(0)
}

/// Returns true if `text` holds nothing but whitespace and parentheses.
///
/// ```rust
/// use policy_sql::is_blank;
///
/// assert!(is_blank(" ( () ) "));
/// assert!(!is_blank("(a)"));
/// ```
pub fn is_blank(text: &str) -> bool {
    tokenize(text).all(|t| t.is_boundary())
}

/// Collapses every run of whitespace to a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
