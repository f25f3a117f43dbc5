//! Statistics about a single graph generation.

/// Statistics about one `generate()` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Total nodes in the graph, including the query root.
    pub node_count: usize,
    /// Total edges in the graph.
    pub edge_count: usize,
    /// Number of `Condition` nodes.
    pub condition_count: usize,
    /// Number of `LogicalOperator` nodes.
    pub group_count: usize,
    /// Number of distinct `Code` nodes.
    pub code_count: usize,
    /// Candidate literals (containing a digit) that resolved to a code.
    pub resolved_tokens: usize,
    /// Candidate literals that matched no dictionary entry.
    pub unresolved_tokens: usize,
    /// Time taken to build the graph in milliseconds.
    pub build_time_ms: u64,
}

impl GenerationStats {
    /// Share of candidate literals that resolved, in `[0, 1]`.
    pub fn resolution_rate(&self) -> f64 {
        let total = self.resolved_tokens + self.unresolved_tokens;
        if total == 0 {
            0.0
        } else {
            self.resolved_tokens as f64 / total as f64
        }
    }
}

impl std::fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Knowledge Graph Statistics:")?;
        writeln!(f, "  Nodes:            {}", self.node_count)?;
        writeln!(f, "  Edges:            {}", self.edge_count)?;
        writeln!(f, "  Conditions:       {}", self.condition_count)?;
        writeln!(f, "  Groups:           {}", self.group_count)?;
        writeln!(f, "  Codes:            {}", self.code_count)?;
        writeln!(
            f,
            "  Literals matched: {}/{} ({:.0}%)",
            self.resolved_tokens,
            self.resolved_tokens + self.unresolved_tokens,
            self.resolution_rate() * 100.0
        )?;
        writeln!(f, "  Build time:       {}ms", self.build_time_ms)?;
        Ok(())
    }
}
