//! WHERE-clause isolation and literal extraction using nom.
//!
//! Policy SQL arrives as free text: a `SELECT ... WHERE <clause>;` statement
//! with `--` line comments and `/* ... */` block comments sprinkled through
//! it. This module strips the comments, finds the `WHERE` keyword and returns
//! the boolean clause that follows it.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till, take_till1, take_until},
    character::complete::{anychar, char},
    combinator::{map, recognize},
    multi::fold_many0,
    sequence::{delimited, pair, tuple},
    IResult,
};

use crate::lexer::{quoted_text, tokenize};

const WHERE_KEYWORD: &str = "WHERE";

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Text(&'a str),
    LineComment,
    BlockComment,
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("--"), take_till(|c: char| c == '\n')))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

fn is_segment_start(c: char) -> bool {
    matches!(c, '-' | '/' | '\'' | '"')
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(line_comment, |_| Segment::LineComment),
        map(block_comment, |_| Segment::BlockComment),
        map(quoted_text, Segment::Text),
        map(take_till1(is_segment_start), Segment::Text),
        map(recognize(anychar), Segment::Text),
    ))(input)
}

/// Removes `--` line comments and `/* ... */` block comments from SQL text.
///
/// Comment markers inside quoted literals are left alone. A block comment is
/// replaced by a single space so that `18/* adult */AND` still tokenizes as
/// two words; an unterminated `/*` is kept as ordinary text.
///
/// ```rust
/// use policy_sql::strip_comments;
///
/// let sql = "age >= 18 -- adults only\nAND bmi >= 40";
/// assert_eq!(strip_comments(sql), "age >= 18 \nAND bmi >= 40");
/// ```
pub fn strip_comments(sql: &str) -> String {
    let folded = fold_many0(
        segment,
        || String::with_capacity(sql.len()),
        |mut acc, seg| {
            match seg {
                Segment::Text(text) => acc.push_str(text),
                Segment::BlockComment => acc.push(' '),
                Segment::LineComment => {}
            }
            acc
        },
    )(sql);

    match folded {
        Ok((_, stripped)) => stripped,
        Err(_) => sql.to_string(),
    }
}

/// Isolates the boolean clause following the first `WHERE` keyword.
///
/// The keyword is matched case-insensitively on word boundaries, outside
/// quoted literals. The clause runs up to the next unquoted `;` or the end
/// of the text. Returns `None` when there is no `WHERE` keyword or nothing
/// follows it.
///
/// ```rust
/// use policy_sql::extract_where_clause;
///
/// let sql = "SELECT * FROM patients WHERE patient_age >= 18; -- adults";
/// assert_eq!(extract_where_clause(sql).as_deref(), Some("patient_age >= 18"));
/// assert_eq!(extract_where_clause("SELECT 1"), None);
/// ```
pub fn extract_where_clause(sql: &str) -> Option<String> {
    let text = strip_comments(sql);
    let mut tokens = tokenize(&text);
    let start = tokens.find(|t| t.is_keyword(WHERE_KEYWORD))?.end();
    let end = tokens
        .find(|t| t.is_punct(';'))
        .map_or(text.len(), |t| t.offset);

    let clause = text[start..end].trim();
    if clause.is_empty() {
        tracing::debug!("WHERE keyword found but clause is empty");
        return None;
    }
    Some(clause.to_string())
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), is_not("'"), char('\''))(input)
}

/// Returns every non-empty single-quoted literal in `text`, left to right.
///
/// Literals are matched pairwise from the left, so `'a','b'` yields `a` and
/// `b`, and an empty literal `''` is skipped.
///
/// ```rust
/// use policy_sql::quoted_literals;
///
/// let literals = quoted_literals("procedure_code IN ('43644', '43645')");
/// assert_eq!(literals, vec!["43644", "43645"]);
/// ```
pub fn quoted_literals(text: &str) -> Vec<&str> {
    let mut literals = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match single_quoted(rest) {
            Ok((remaining, literal)) => {
                literals.push(literal);
                rest = remaining;
            }
            Err(_) => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }
    literals
}
