//! Clause parser: decomposes a boolean clause into a pre-order tree.
//!
//! Decomposition tries each operator of [`PRECEDENCE`] in order and takes
//! the first one that splits the text into two or more top-level operands.
//! OR is tried before AND, so AND binds tighter and AND-groups end up nested
//! inside OR-groups. Text that no operator splits becomes a leaf condition.
//!
//! Traversal uses an explicit work stack instead of recursion. Children are
//! pushed in reverse so that pops happen left to right, which yields exactly
//! the pre-order a recursive descent would produce.

use crate::ast::{BooleanOperator, ClauseNode, ClauseNodeKind, Condition, ParsedClause};
use crate::config::ParseOptions;
use crate::error::{SqlError, SqlResult};
use crate::extract::extract_where_clause;
use crate::scanner::{is_blank, max_paren_depth, split_top_level, strip_enclosing_parens};

/// Operators tried at every level, coarsest grouping first.
pub const PRECEDENCE: [BooleanOperator; 2] = [BooleanOperator::Or, BooleanOperator::And];

/// Outcome of one decomposition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decomposition<'a> {
    /// The text splits into two or more operands of the operator.
    Group(BooleanOperator, Vec<&'a str>),
    /// The text splits, but only one operand is not blank; it stands in for
    /// the whole text.
    Single(&'a str),
    /// The text is atomic.
    Leaf,
}

/// Decomposes one level of `text` (which should already be stripped of
/// enclosing parentheses).
///
/// Operands holding only parentheses and whitespace, such as `()`, are
/// dropped before the operand count is taken.
///
/// ```rust
/// use policy_sql::{decompose, BooleanOperator, Decomposition};
///
/// assert_eq!(
///     decompose("a = 1 OR b = 2"),
///     Decomposition::Group(BooleanOperator::Or, vec!["a = 1", "b = 2"])
/// );
/// assert_eq!(decompose("a = 1 AND ()"), Decomposition::Single("a = 1"));
/// assert_eq!(decompose("a = 1"), Decomposition::Leaf);
/// ```
pub fn decompose(text: &str) -> Decomposition<'_> {
    PRECEDENCE
        .iter()
        .find_map(|&operator| {
            let parts = split_top_level(text, operator);
            if parts.len() < 2 {
                return None;
            }
            let mut operands: Vec<&str> = parts.into_iter().filter(|p| !is_blank(p)).collect();
            match operands.len() {
                0 => None,
                1 => operands.pop().map(Decomposition::Single),
                _ => Some(Decomposition::Group(operator, operands)),
            }
        })
        .unwrap_or(Decomposition::Leaf)
}

/// Parses a boolean clause with default options.
///
/// ```rust
/// use policy_sql::{parse_clause, BooleanOperator};
///
/// let clause = parse_clause("age >= 18 AND (bmi >= 40 OR bmi >= 35)").unwrap();
/// assert_eq!(clause.root().unwrap().operator(), Some(BooleanOperator::And));
/// assert_eq!(clause.condition_count(), 3);
/// ```
pub fn parse_clause(clause: &str) -> SqlResult<ParsedClause> {
    parse_clause_with(clause, &ParseOptions::default())
}

/// Parses a boolean clause.
///
/// Returns an empty [`ParsedClause`] for blank input (or input that is only
/// parentheses). Fails only when the nesting depth exceeds
/// [`ParseOptions::max_depth`]; unbalanced text degrades to a leaf.
pub fn parse_clause_with(clause: &str, options: &ParseOptions) -> SqlResult<ParsedClause> {
    let depth = max_paren_depth(clause);
    if depth > options.max_depth {
        return Err(SqlError::NestingTooDeep {
            depth,
            limit: options.max_depth,
        });
    }

    if is_blank(clause) {
        return Ok(ParsedClause::empty());
    }

    let mut nodes: Vec<ClauseNode> = Vec::new();
    let mut stack: Vec<(&str, Option<usize>, usize)> = vec![(clause, None, 0)];

    while let Some((text, parent, level)) = stack.pop() {
        let text = strip_enclosing_parens(text);
        let index = nodes.len();

        let kind = match decompose(text) {
            Decomposition::Single(operand) => {
                stack.push((operand, parent, level));
                continue;
            }
            Decomposition::Group(operator, parts) => {
                tracing::debug!(%operator, operands = parts.len(), level, "clause group");
                for part in parts.into_iter().rev() {
                    stack.push((part, Some(index), level + 1));
                }
                ClauseNodeKind::Group(operator)
            }
            Decomposition::Leaf => {
                let condition = Condition::new(text);
                tracing::debug!(label = %condition.label, level, "clause leaf");
                ClauseNodeKind::Condition(condition)
            }
        };

        if let Some(parent) = parent {
            nodes[parent].children.push(index);
        }
        nodes.push(ClauseNode {
            kind,
            parent,
            children: Vec::new(),
            depth: level,
        });
    }

    Ok(ParsedClause::from_nodes(nodes))
}

/// Extracts the WHERE clause from policy SQL and parses it.
///
/// SQL without a `WHERE` keyword yields an empty clause.
pub fn parse_policy_sql(sql: &str, options: &ParseOptions) -> SqlResult<ParsedClause> {
    match extract_where_clause(sql) {
        Some(clause) => parse_clause_with(&clause, options),
        None => {
            tracing::debug!("no WHERE clause found");
            Ok(ParsedClause::empty())
        }
    }
}
