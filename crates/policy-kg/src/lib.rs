//! # policy-kg
//!
//! Knowledge graph generation from SQL-encoded medical policy rules.
//!
//! This crate ties the clause parser (`policy-sql`) and the code resolver
//! (`policy-codes`) together: each policy becomes a directed property graph
//! whose nodes are the query, its AND/OR groups, its leaf conditions and the
//! medical codes those conditions mention.
//!
//! ## Graph Shape
//!
//! | Node type | Id | Attributes |
//! |-----------|----|------------|
//! | `Query` | `query_<name>` | `file` (when generated from a file) |
//! | `LogicalOperator` | `group_and_001`, `group_or_002`, ... | `operator` |
//! | `Condition` | `condition_001`, ... | `raw_expression` |
//! | `Code` | `code_<code_type>_<code>` | `code`, `code_type`, `description`, `source_key` |
//!
//! Query, group and condition nodes are linked parent-to-child by `logic`
//! edges carrying the parent's operator (`ROOT` below the query). Conditions
//! point at codes through `references` edges carrying `code_type`.
//!
//! ## Quick Start
//!
//! ```rust
//! use policy_codes::{CodeDictionary, CodeIndex};
//! use policy_kg::{KnowledgeGraphGenerator, NodeType};
//!
//! let dictionary = CodeDictionary::from_json_str(r#"{
//!     "ICD10_Diagnosis": {"E08-E13": "Diabetes mellitus"}
//! }"#).unwrap();
//! let index = CodeIndex::new(&dictionary);
//!
//! let sql = "SELECT * FROM patients
//!            WHERE patient_age >= 18
//!              AND (diagnosis_code IN ('E11') OR patient_bmi >= 40);";
//!
//! let output = KnowledgeGraphGenerator::new(&index).generate("bariatric", sql).unwrap();
//! assert_eq!(output.stats.group_count, 2);
//! assert_eq!(output.stats.condition_count, 3);
//! assert_eq!(output.graph.nodes_of_type(NodeType::Code).count(), 1);
//! ```
//!
//! ## From Files
//!
//! ```no_run
//! use policy_kg::{generate_from_paths, GeneratorConfig};
//!
//! let config = GeneratorConfig::default();
//! let output = generate_from_paths("policies/bariatric.sql", "codes.json", config)?;
//! println!("{}", output.stats);
//! # Ok::<(), policy_kg::KgError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod generator;
mod stats;

pub mod graph;
pub mod persistence;

use std::path::Path;

use policy_codes::{CodeDictionary, CodeIndex};

pub use config::{
    GeneratorConfig, GeneratorConfigBuilder, DEFAULT_EDGES_FILENAME, DEFAULT_NODES_FILENAME,
};
pub use error::{KgError, KgResult};
pub use generator::{code_node_id, GenerationOutput, KnowledgeGraphGenerator, ROOT_OPERATOR};
pub use graph::{Edge, GraphStore, KnowledgeGraph, Node, NodeType};
pub use persistence::GraphFiles;
pub use stats::GenerationStats;

/// Loads a code dictionary and generates the graph for one SQL file.
///
/// # Errors
///
/// - [`KgError::Codes`] if the dictionary is missing or malformed
/// - [`KgError::SqlFileNotFound`] if the SQL file does not exist
pub fn generate_from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
    sql_path: P,
    dictionary_path: Q,
    config: GeneratorConfig,
) -> KgResult<GenerationOutput> {
    let dictionary = CodeDictionary::from_path(dictionary_path)?;
    let index = CodeIndex::new(&dictionary);
    KnowledgeGraphGenerator::with_config(&index, config).generate_from_file(sql_path)
}
