//! Knowledge graph generator implementation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use policy_codes::{looks_like_code, CodeEntry, CodeResolver};
use policy_sql::{parse_policy_sql, ClauseNodeKind, Condition, ParsedClause};

use crate::config::GeneratorConfig;
use crate::error::{KgError, KgResult};
use crate::graph::{attributes, relation, Attributes, GraphStore, KnowledgeGraph, NodeType};
use crate::persistence::{save_graph, GraphFiles};
use crate::stats::GenerationStats;

/// Incoming operator recorded on the query root's outgoing edge.
pub const ROOT_OPERATOR: &str = "ROOT";

/// Result of one `generate()` call.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The generated graph.
    pub graph: KnowledgeGraph,
    /// Generation statistics.
    pub stats: GenerationStats,
    /// The SQL file the graph was generated from, if any.
    pub source_path: Option<PathBuf>,
}

/// Turns policy SQL into a knowledge graph.
///
/// The generator bridges the clause parser (`policy-sql`) and any code
/// source implementing [`CodeResolver`]. Every call to [`generate`] builds a
/// fresh graph with its own id counters, so one generator can be reused and
/// repeated calls over the same input give identical output.
///
/// # Example
///
/// ```rust
/// use policy_codes::{CodeDictionary, CodeIndex};
/// use policy_kg::{KnowledgeGraphGenerator, NodeType};
///
/// let json = r#"{"CPT": {"43644": "Gastric bypass"}}"#;
/// let dictionary = CodeDictionary::from_json_str(json).unwrap();
/// let index = CodeIndex::new(&dictionary);
/// let generator = KnowledgeGraphGenerator::new(&index);
///
/// let output = generator
///     .generate("bariatric", "SELECT * FROM p WHERE procedure_code IN ('43644','99999')")
///     .unwrap();
///
/// assert_eq!(output.graph.nodes_of_type(NodeType::Code).count(), 1);
/// assert!(output.graph.node("code_CPT_43644").is_some());
/// ```
///
/// [`generate`]: KnowledgeGraphGenerator::generate
pub struct KnowledgeGraphGenerator<'a> {
    /// Code source used to annotate leaf conditions.
    resolver: &'a dyn CodeResolver,
    /// Generator configuration.
    config: GeneratorConfig,
}

impl<'a> KnowledgeGraphGenerator<'a> {
    /// Creates a generator with default configuration.
    pub fn new(resolver: &'a dyn CodeResolver) -> Self {
        Self::with_config(resolver, GeneratorConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(resolver: &'a dyn CodeResolver, config: GeneratorConfig) -> Self {
        Self { resolver, config }
    }

    /// Returns a reference to the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a graph for SQL text held in memory.
    ///
    /// `name` becomes part of the root id (`query_<name>`). SQL without a
    /// `WHERE` clause yields an empty graph.
    ///
    /// # Errors
    ///
    /// Returns [`KgError::Parse`] if the clause nests parentheses deeper
    /// than the configured limit.
    pub fn generate(&self, name: &str, sql: &str) -> KgResult<GenerationOutput> {
        self.generate_inner(name, sql, Attributes::new(), None)
    }

    /// Generates a graph from a SQL file.
    ///
    /// The root is named after the file stem and carries the absolute file
    /// path as its `file` attribute.
    ///
    /// # Errors
    ///
    /// - [`KgError::SqlFileNotFound`] if the file does not exist
    /// - [`KgError::Io`] if it cannot be read
    /// - [`KgError::Parse`] if the clause nests too deeply
    pub fn generate_from_file<P: AsRef<Path>>(&self, path: P) -> KgResult<GenerationOutput> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KgError::SqlFileNotFound(path.to_path_buf()));
        }

        let absolute = path.canonicalize().map_err(|e| KgError::io_error(path, e))?;
        let sql = fs::read_to_string(&absolute).map_err(|e| KgError::io_error(&absolute, e))?;
        let name = absolute
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(path = %absolute.display(), bytes = sql.len(), "read policy SQL");

        let root_attrs = attributes([("file", absolute.to_string_lossy().into_owned())]);
        self.generate_inner(&name, &sql, root_attrs, Some(absolute))
    }

    /// Writes a generated graph to the configured output directory.
    ///
    /// Without an explicit `output_dir`, files go next to the source SQL
    /// file, or into the current directory for in-memory input.
    pub fn save(&self, output: &GenerationOutput) -> KgResult<GraphFiles> {
        let dir = self.config.output_dir_for(output.source_path.as_deref());
        save_graph(
            &output.graph,
            dir,
            &self.config.nodes_filename,
            &self.config.edges_filename,
        )
    }

    fn generate_inner(
        &self,
        name: &str,
        sql: &str,
        root_attrs: Attributes,
        source_path: Option<PathBuf>,
    ) -> KgResult<GenerationOutput> {
        let start = Instant::now();
        let clause = parse_policy_sql(sql, &self.config.parse_options)?;

        let mut builder = GraphBuilder::new(self.resolver);
        if clause.is_empty() {
            tracing::info!(query = name, "no WHERE clause found; graph is empty");
        } else {
            builder.build(name, &clause, root_attrs);
        }

        let mut stats = builder.stats;
        let graph = builder.store.into_graph();
        stats.node_count = graph.nodes.len();
        stats.edge_count = graph.edges.len();
        stats.condition_count = graph.nodes_of_type(NodeType::Condition).count();
        stats.group_count = graph.nodes_of_type(NodeType::LogicalOperator).count();
        stats.code_count = graph.nodes_of_type(NodeType::Code).count();
        stats.build_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            query = name,
            nodes = stats.node_count,
            edges = stats.edge_count,
            codes = stats.code_count,
            "generated knowledge graph"
        );

        Ok(GenerationOutput {
            graph,
            stats,
            source_path,
        })
    }
}

/// Per-invocation id counters.
#[derive(Debug, Default)]
struct IdAllocator {
    conditions: usize,
    groups: usize,
}

impl IdAllocator {
    fn next_condition(&mut self) -> String {
        self.conditions += 1;
        format!("condition_{:03}", self.conditions)
    }

    fn next_group(&mut self, keyword: &str) -> String {
        self.groups += 1;
        format!("group_{}_{:03}", keyword.to_lowercase(), self.groups)
    }
}

/// Mutable state of a single generation.
struct GraphBuilder<'r> {
    resolver: &'r dyn CodeResolver,
    store: GraphStore,
    ids: IdAllocator,
    stats: GenerationStats,
}

impl<'r> GraphBuilder<'r> {
    fn new(resolver: &'r dyn CodeResolver) -> Self {
        Self {
            resolver,
            store: GraphStore::new(),
            ids: IdAllocator::default(),
            stats: GenerationStats::default(),
        }
    }

    /// Emits the root and then every clause node in pre-order, so group and
    /// condition counters follow the same order as a recursive descent.
    fn build(&mut self, name: &str, clause: &ParsedClause, root_attrs: Attributes) {
        let root_id = format!("query_{}", name);
        self.store.register_node(
            root_id.clone(),
            NodeType::Query,
            format!("SQL Query: {}", name),
            root_attrs,
        );

        let mut graph_ids: Vec<String> = Vec::with_capacity(clause.len());
        for (index, node) in clause.nodes().iter().enumerate() {
            let parent_id = match node.parent {
                Some(parent) => graph_ids[parent].clone(),
                None => root_id.clone(),
            };
            let incoming = clause
                .incoming_operator(index)
                .map(|op| op.keyword())
                .unwrap_or(ROOT_OPERATOR);

            let id = match &node.kind {
                ClauseNodeKind::Group(op) => {
                    let id = self.ids.next_group(op.keyword());
                    self.store.register_node(
                        id.clone(),
                        NodeType::LogicalOperator,
                        op.group_label(),
                        attributes([("operator", op.keyword())]),
                    );
                    tracing::debug!(id = %id, parent = %parent_id, "created group");
                    id
                }
                ClauseNodeKind::Condition(condition) => {
                    let id = self.ids.next_condition();
                    self.store.register_node(
                        id.clone(),
                        NodeType::Condition,
                        condition.label.clone(),
                        attributes([("raw_expression", condition.raw.as_str())]),
                    );
                    tracing::debug!(id = %id, label = %condition.label, "created condition");
                    id
                }
            };

            self.store.register_edge(
                parent_id,
                id.clone(),
                relation::LOGIC,
                attributes([("logical_operator", incoming)]),
            );

            if let ClauseNodeKind::Condition(condition) = &node.kind {
                self.annotate_codes(&id, condition);
            }
            graph_ids.push(id);
        }
    }

    fn annotate_codes(&mut self, condition_id: &str, condition: &Condition) {
        let mut seen = HashSet::new();
        for literal in condition.quoted_literals() {
            let token = literal.to_uppercase();
            if !seen.insert(token.clone()) || !looks_like_code(&token) {
                continue;
            }

            match self.resolver.resolve(&token) {
                Some(entry) => {
                    self.stats.resolved_tokens += 1;
                    self.link_code(condition_id, entry);
                }
                None => {
                    self.stats.unresolved_tokens += 1;
                    tracing::debug!(
                        token = %token,
                        condition = condition_id,
                        "literal is not a known code"
                    );
                }
            }
        }
    }

    fn link_code(&mut self, condition_id: &str, entry: CodeEntry) {
        let id = code_node_id(&entry);
        tracing::debug!(
            id = %id,
            condition = condition_id,
            source_key = %entry.source_key,
            "resolved code"
        );

        let edge_attrs = attributes([("code_type", entry.code_type.as_str())]);
        self.store.register_node(
            id.clone(),
            NodeType::Code,
            format!("{}: {}", entry.code_type, entry.code),
            attributes([
                ("code", entry.code),
                ("code_type", entry.code_type),
                ("description", entry.description),
                ("source_key", entry.source_key),
            ]),
        );
        self.store
            .register_edge(condition_id, id, relation::REFERENCES, edge_attrs);
    }
}

/// Graph id of a code node: `code_<code_type>_<code>` with spaces replaced.
pub fn code_node_id(entry: &CodeEntry) -> String {
    format!("code_{}_{}", entry.code_type, entry.code).replace(' ', "_")
}
