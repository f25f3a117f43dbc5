//! Property graph model: nodes, edges and the exported graph.
//!
//! The exported form is the wire contract consumed by visualization and
//! patient-evaluation tools. Nodes serialize as `{id, type, label, ...}` and
//! edges as `{source, target, relation, ...}`, with attributes flattened
//! into the same JSON object.

mod store;

pub use store::GraphStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String-valued attributes attached to a node or edge.
pub type Attributes = BTreeMap<String, String>;

/// Keys owned by the node record itself; never stored as attributes.
pub const RESERVED_NODE_KEYS: [&str; 3] = ["id", "type", "label"];

/// Keys owned by the edge record itself; never stored as attributes.
pub const RESERVED_EDGE_KEYS: [&str; 3] = ["source", "target", "relation"];

/// Builds an attribute map from key/value pairs.
///
/// ```rust
/// use policy_kg::graph::attributes;
///
/// let attrs = attributes([("operator", "AND")]);
/// assert_eq!(attrs["operator"], "AND");
/// ```
pub fn attributes<K, V, I>(pairs: I) -> Attributes
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Relation names used on edges.
pub mod relation {
    /// Parent group (or query root) to child group or condition.
    pub const LOGIC: &str = "logic";
    /// Condition to a code it mentions.
    pub const REFERENCES: &str = "references";
}

/// Kind of graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// The policy query as a whole.
    Query,
    /// An AND or OR group.
    LogicalOperator,
    /// A leaf condition.
    Condition,
    /// A medical code referenced by a condition.
    Code,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeType::Query => "Query",
            NodeType::LogicalOperator => "LogicalOperator",
            NodeType::Condition => "Condition",
            NodeType::Code => "Code",
        };
        f.write_str(name)
    }
}

/// A graph node. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, e.g. `condition_001`.
    pub id: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display label.
    pub label: String,
    /// Additional attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Node {
    /// Gets an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A directed graph edge. Identity is the ordered `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Relation name, see [`relation`].
    pub relation: String,
    /// Additional attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Edge {
    /// Gets an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Read-only snapshot of a graph: nodes and edges in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    /// Nodes in registration order.
    pub nodes: Vec<Node>,
    /// Edges in registration order.
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    /// Returns true if the graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Finds a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Finds the edge between two nodes.
    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Nodes of one type, in registration order.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    /// Outgoing edges of a node, in registration order.
    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == source)
    }

    /// Targets of a node's outgoing edges with the given relation.
    pub fn children<'a>(
        &'a self,
        source: &'a str,
        relation: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.edges_from(source)
            .filter(move |e| e.relation == relation)
            .filter_map(move |e| self.node(&e.target))
    }
}
