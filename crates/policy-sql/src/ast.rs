//! Clause tree types produced by the parser.

use crate::extract::quoted_literals;
use crate::scanner::normalize_whitespace;

/// Boolean combinator joining the operands of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOperator {
    /// Conjunction: `AND`
    And,
    /// Disjunction: `OR`
    Or,
}

impl BooleanOperator {
    /// The SQL keyword for this operator, in upper case.
    pub fn keyword(self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
        }
    }

    /// Human-readable label for a group joined by this operator.
    pub fn group_label(self) -> &'static str {
        match self {
            BooleanOperator::And => "AND group",
            BooleanOperator::Or => "OR group",
        }
    }
}

impl std::fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A leaf comparison that top-level AND/OR splitting cannot decompose.
///
/// Example: `procedure_code IN ('43644', '43645')`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    /// The leaf text as it appeared in the clause (enclosing parentheses removed).
    pub raw: String,
    /// The leaf text with whitespace runs collapsed to single spaces.
    pub label: String,
}

impl Condition {
    /// Creates a condition from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let label = normalize_whitespace(&raw);
        Self { raw, label }
    }

    /// Single-quoted literals appearing in the normalized label.
    pub fn quoted_literals(&self) -> Vec<&str> {
        quoted_literals(&self.label)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// What a clause node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClauseNodeKind {
    /// A logical group whose children are joined by the operator.
    Group(BooleanOperator),
    /// A leaf condition.
    Condition(Condition),
}

/// One node of a parsed clause, stored in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClauseNode {
    /// Group or leaf payload.
    pub kind: ClauseNodeKind,
    /// Index of the parent group (`None` for the top-level node).
    pub parent: Option<usize>,
    /// Indices of child nodes, left to right.
    pub children: Vec<usize>,
    /// Distance from the top-level node.
    pub depth: usize,
}

impl ClauseNode {
    /// Returns the group operator, if this node is a group.
    pub fn operator(&self) -> Option<BooleanOperator> {
        match &self.kind {
            ClauseNodeKind::Group(op) => Some(*op),
            ClauseNodeKind::Condition(_) => None,
        }
    }

    /// Returns the leaf condition, if this node is a leaf.
    pub fn condition(&self) -> Option<&Condition> {
        match &self.kind {
            ClauseNodeKind::Condition(c) => Some(c),
            ClauseNodeKind::Group(_) => None,
        }
    }
}

/// A boolean clause decomposed into OR-groups, AND-groups and leaf conditions.
///
/// Nodes are stored flat in pre-order: a group always precedes its children,
/// and a child's whole subtree precedes its next sibling. Index `0` is the
/// top-level node when the clause is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedClause {
    nodes: Vec<ClauseNode>,
}

impl ParsedClause {
    pub(crate) fn from_nodes(nodes: Vec<ClauseNode>) -> Self {
        Self { nodes }
    }

    /// Creates a clause with no nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> &[ClauseNode] {
        &self.nodes
    }

    /// Gets a node by index.
    pub fn get(&self, index: usize) -> Option<&ClauseNode> {
        self.nodes.get(index)
    }

    /// The top-level node, if the clause is non-empty.
    pub fn root(&self) -> Option<&ClauseNode> {
        self.nodes.first()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the clause has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf conditions in left-to-right order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.nodes.iter().filter_map(ClauseNode::condition)
    }

    /// Number of leaf conditions.
    pub fn condition_count(&self) -> usize {
        self.conditions().count()
    }

    /// Number of logical groups.
    pub fn group_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.operator().is_some()).count()
    }

    /// Operator of the group that owns the node at `index`.
    ///
    /// `None` for the top-level node or an out-of-range index.
    pub fn incoming_operator(&self, index: usize) -> Option<BooleanOperator> {
        let parent = self.nodes.get(index)?.parent?;
        self.nodes.get(parent)?.operator()
    }

    fn write_node(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        index: usize,
        nested: bool,
    ) -> std::fmt::Result {
        let node = &self.nodes[index];
        match &node.kind {
            ClauseNodeKind::Condition(condition) => write!(f, "{}", condition),
            ClauseNodeKind::Group(op) => {
                if nested {
                    f.write_str("(")?;
                }
                for (position, child) in node.children.iter().enumerate() {
                    if position > 0 {
                        write!(f, " {} ", op)?;
                    }
                    self.write_node(f, *child, true)?;
                }
                if nested {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the clause with normalized whitespace and explicit grouping.
impl std::fmt::Display for ParsedClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nodes.is_empty() {
            return Ok(());
        }
        self.write_node(f, 0, false)
    }
}
