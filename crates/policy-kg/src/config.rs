//! Configuration types for the knowledge graph generator.

use std::path::{Path, PathBuf};

use policy_sql::ParseOptions;

/// Default file name for exported nodes.
pub const DEFAULT_NODES_FILENAME: &str = "kg_nodes.json";

/// Default file name for exported edges.
pub const DEFAULT_EDGES_FILENAME: &str = "kg_edges.json";

/// Configuration for the knowledge graph generator.
///
/// # Example
///
/// ```rust
/// use policy_kg::GeneratorConfig;
/// use policy_sql::ParseOptions;
///
/// let config = GeneratorConfig::builder()
///     .with_output_dir("out")
///     .with_nodes_filename("nodes.json")
///     .with_parse_options(ParseOptions::builder().with_max_depth(16).build())
///     .build();
///
/// assert_eq!(config.nodes_filename, "nodes.json");
/// assert_eq!(config.edges_filename, "kg_edges.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Where graph files are written (None = next to the SQL file, or the
    /// current directory for in-memory input).
    pub output_dir: Option<PathBuf>,
    /// File name for the nodes array.
    pub nodes_filename: String,
    /// File name for the edges array.
    pub edges_filename: String,
    /// Options passed to the clause parser.
    pub parse_options: ParseOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            nodes_filename: DEFAULT_NODES_FILENAME.to_string(),
            edges_filename: DEFAULT_EDGES_FILENAME.to_string(),
            parse_options: ParseOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new builder for GeneratorConfig.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Resolves the directory graph files go to for a given source file.
    pub fn output_dir_for(&self, source: Option<&Path>) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        source
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Builder for GeneratorConfig.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfigBuilder {
    output_dir: Option<PathBuf>,
    nodes_filename: Option<String>,
    edges_filename: Option<String>,
    parse_options: Option<ParseOptions>,
}

impl GeneratorConfigBuilder {
    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the nodes file name.
    pub fn with_nodes_filename(mut self, name: impl Into<String>) -> Self {
        self.nodes_filename = Some(name.into());
        self
    }

    /// Sets the edges file name.
    pub fn with_edges_filename(mut self, name: impl Into<String>) -> Self {
        self.edges_filename = Some(name.into());
        self
    }

    /// Sets the clause parser options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = Some(options);
        self
    }

    /// Builds the GeneratorConfig.
    pub fn build(self) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: self.output_dir,
            nodes_filename: self
                .nodes_filename
                .unwrap_or_else(|| DEFAULT_NODES_FILENAME.to_string()),
            edges_filename: self
                .edges_filename
                .unwrap_or_else(|| DEFAULT_EDGES_FILENAME.to_string()),
            parse_options: self.parse_options.unwrap_or_default(),
        }
    }
}
