//! Save/load graph exports as JSON files.
//!
//! A graph is stored as two pretty-printed JSON arrays:
//!
//! | File | Content |
//! |------|---------|
//! | `kg_nodes.json` | `[{"id", "type", "label", ...attributes}]` |
//! | `kg_edges.json` | `[{"source", "target", "relation", ...attributes}]` |
//!
//! # Example
//!
//! ```no_run
//! use policy_kg::persistence::{load_graph, save_graph};
//! use policy_kg::KnowledgeGraph;
//!
//! let files = save_graph(&KnowledgeGraph::default(), "out", "kg_nodes.json", "kg_edges.json")?;
//! let graph = load_graph(&files.nodes, &files.edges)?;
//! # Ok::<(), policy_kg::KgError>(())
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KgError, KgResult};
use crate::graph::{Edge, KnowledgeGraph, Node};

/// Paths of a saved graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFiles {
    /// Nodes file.
    pub nodes: PathBuf,
    /// Edges file.
    pub edges: PathBuf,
}

/// Writes a graph into `dir`, creating the directory if needed.
pub fn save_graph<P: AsRef<Path>>(
    graph: &KnowledgeGraph,
    dir: P,
    nodes_filename: &str,
    edges_filename: &str,
) -> KgResult<GraphFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| KgError::io_error(dir, e))?;

    let files = GraphFiles {
        nodes: dir.join(nodes_filename),
        edges: dir.join(edges_filename),
    };
    write_json(&files.nodes, &graph.nodes)?;
    write_json(&files.edges, &graph.edges)?;

    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        nodes_file = %files.nodes.display(),
        edges_file = %files.edges.display(),
        "saved knowledge graph"
    );
    Ok(files)
}

/// Reads a graph previously written by [`save_graph`].
pub fn load_graph<P: AsRef<Path>, Q: AsRef<Path>>(
    nodes_path: P,
    edges_path: Q,
) -> KgResult<KnowledgeGraph> {
    let nodes: Vec<Node> = read_json(nodes_path.as_ref())?;
    let edges: Vec<Edge> = read_json(edges_path.as_ref())?;
    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "loaded knowledge graph");
    Ok(KnowledgeGraph { nodes, edges })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> KgResult<()> {
    let file = File::create(path).map_err(|e| KgError::io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| KgError::io_error(path, e))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> KgResult<T> {
    let file = File::open(path).map_err(|e| KgError::io_error(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
