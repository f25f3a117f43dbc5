//! Idempotent node/edge registry with attribute-merge semantics.

use std::collections::HashMap;

use super::{
    Attributes, Edge, KnowledgeGraph, Node, NodeType, RESERVED_EDGE_KEYS, RESERVED_NODE_KEYS,
};

/// Accumulates nodes and edges, deduplicating by identity.
///
/// - Nodes are keyed by `id`. Re-registering an id merges the new attributes
///   into the existing node (new keys added, existing keys overwritten); the
///   node's type and label never change after the first registration.
/// - Edges are keyed by the ordered `(source, target)` pair only. The first
///   registration fixes the relation; later registrations for the same pair
///   merge attributes but keep the original relation, even when a different
///   one is supplied.
///
/// Registration order is preserved for export. Attributes whose key collides
/// with a record field (`id`/`type`/`label` for nodes,
/// `source`/`target`/`relation` for edges) are dropped.
///
/// # Example
///
/// ```rust
/// use policy_kg::graph::{attributes, GraphStore, NodeType};
///
/// let mut store = GraphStore::new();
/// store.register_node("condition_001", NodeType::Condition, "a = 1", attributes([("x", "1")]));
/// store.register_node("condition_001", NodeType::Code, "ignored", attributes([("y", "2")]));
///
/// let node = store.node("condition_001").unwrap();
/// assert_eq!(node.node_type, NodeType::Condition);
/// assert_eq!(node.attributes.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(String, String), usize>,
}

impl GraphStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from an exported graph.
    ///
    /// Nodes and edges are re-registered in order, so duplicates in the
    /// input collapse under the usual merge rules.
    pub fn from_graph(graph: KnowledgeGraph) -> Self {
        let mut store = Self::new();
        for node in graph.nodes {
            store.register_node(node.id, node.node_type, node.label, node.attributes);
        }
        for edge in graph.edges {
            store.register_edge(edge.source, edge.target, edge.relation, edge.attributes);
        }
        store
    }

    /// Registers a node or merges attributes into an existing one.
    pub fn register_node(
        &mut self,
        id: impl Into<String>,
        node_type: NodeType,
        label: impl Into<String>,
        attrs: Attributes,
    ) -> &Node {
        let id = id.into();
        let attrs = without_reserved(attrs, &RESERVED_NODE_KEYS);

        let index = match self.node_index.get(&id) {
            Some(&index) => {
                self.nodes[index].attributes.extend(attrs);
                index
            }
            None => {
                let index = self.nodes.len();
                self.node_index.insert(id.clone(), index);
                self.nodes.push(Node {
                    id,
                    node_type,
                    label: label.into(),
                    attributes: attrs,
                });
                index
            }
        };
        &self.nodes[index]
    }

    /// Registers an edge or merges attributes into the existing edge for the
    /// same `(source, target)` pair.
    pub fn register_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
        attrs: Attributes,
    ) -> &Edge {
        let key = (source.into(), target.into());
        let attrs = without_reserved(attrs, &RESERVED_EDGE_KEYS);

        let index = match self.edge_index.get(&key) {
            Some(&index) => {
                let relation = relation.into();
                let edge = &mut self.edges[index];
                if edge.relation != relation {
                    tracing::debug!(
                        source = %edge.source,
                        target = %edge.target,
                        kept = %edge.relation,
                        ignored = %relation,
                        "duplicate edge with different relation; keeping first"
                    );
                }
                edge.attributes.extend(attrs);
                index
            }
            None => {
                let index = self.edges.len();
                let (source, target) = key.clone();
                self.edge_index.insert(key, index);
                self.edges.push(Edge {
                    source,
                    target,
                    relation: relation.into(),
                    attributes: attrs,
                });
                index
            }
        };
        &self.edges[index]
    }

    /// Gets a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Returns true if a node with this id is registered.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Gets the edge for a `(source, target)` pair.
    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edge_index
            .get(&(source.to_string(), target.to_string()))
            .map(|&i| &self.edges[i])
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in registration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Removes all nodes and edges.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
    }

    /// Takes a snapshot of the current graph.
    pub fn export(&self) -> KnowledgeGraph {
        KnowledgeGraph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Consumes the store, returning its graph.
    pub fn into_graph(self) -> KnowledgeGraph {
        KnowledgeGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

impl From<KnowledgeGraph> for GraphStore {
    fn from(graph: KnowledgeGraph) -> Self {
        Self::from_graph(graph)
    }
}

fn without_reserved(mut attrs: Attributes, reserved: &[&str]) -> Attributes {
    for key in reserved {
        if attrs.remove(*key).is_some() {
            tracing::warn!(key = *key, "dropping attribute that shadows a record field");
        }
    }
    attrs
}
