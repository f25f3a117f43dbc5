//! # policy-sql
//!
//! Parsing of SQL-encoded medical policy rules into boolean clause trees.
//!
//! A policy such as
//!
//! ```sql
//! SELECT * FROM patients
//! WHERE patient_age >= 18
//!   AND (patient_bmi >= 40 OR (patient_bmi >= 35 AND comorbidity_flag = 1));
//! ```
//!
//! is reduced to its `WHERE` clause and decomposed into nested OR-groups,
//! AND-groups and leaf conditions. Only the boolean structure is parsed; leaf
//! conditions are kept as text (with their quoted literals available for
//! code lookup).
//!
//! ## Usage
//!
//! ```rust
//! use policy_sql::{parse_policy_sql, BooleanOperator, ParseOptions};
//!
//! let sql = "SELECT * FROM p WHERE age >= 18 AND (bmi >= 40 OR dx IN ('E66.01'))";
//! let clause = parse_policy_sql(sql, &ParseOptions::default()).unwrap();
//!
//! assert_eq!(clause.root().unwrap().operator(), Some(BooleanOperator::And));
//! assert_eq!(clause.group_count(), 2);
//! assert_eq!(clause.condition_count(), 3);
//! ```
//!
//! ## Precedence
//!
//! | Step | Action |
//! |------|--------|
//! | 1 | Strip parentheses that wrap the whole expression |
//! | 2 | Split on top-level `OR`; if ≥ 2 operands, emit an OR-group |
//! | 3 | Otherwise split on top-level `AND`; if ≥ 2 operands, emit an AND-group |
//! | 4 | Otherwise emit a leaf condition |
//!
//! ## Non-goals
//!
//! Subqueries, JOINs, function calls and the rest of the SQL grammar are not
//! interpreted; they survive verbatim inside leaf conditions.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod config;
mod error;
mod extract;
mod lexer;
mod parser;
mod scanner;

pub use ast::{BooleanOperator, ClauseNode, ClauseNodeKind, Condition, ParsedClause};
pub use config::{ParseOptions, ParseOptionsBuilder, DEFAULT_MAX_DEPTH};
pub use error::{SqlError, SqlResult};
pub use extract::{extract_where_clause, quoted_literals, strip_comments};
pub use parser::{
    decompose, parse_clause, parse_clause_with, parse_policy_sql, Decomposition, PRECEDENCE,
};
pub use scanner::{
    is_blank, max_paren_depth, normalize_whitespace, split_top_level, strip_enclosing_parens,
};
