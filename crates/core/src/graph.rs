//! Graph data structures for file-level import tracking
//!
//! Uses `petgraph::StableGraph` so the result can be handed straight to
//! graph algorithms. Nodes and edges are never removed, so iteration order
//! is insertion order: files in enumeration order, edges in extraction order.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::resolve::normalize_path;

/// Canonical absolute path identifying one source file within a build.
///
/// Always uses `/` as separator and contains no `.` or `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(path: impl AsRef<str>) -> Self {
        FileId(normalize_path(path.as_ref()))
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component, used as the display label
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Directory containing the file: `/` at the root of an absolute id,
    /// empty for a relative id without directories
    pub fn parent(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) => "/",
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node in the import graph: one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: FileId,
    /// Display name (final path component)
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
}

impl Node {
    pub fn file(id: FileId) -> Self {
        Self {
            label: id.file_name().to_string(),
            id,
            kind: NodeKind::File,
        }
    }
}

/// Types of nodes. Files are the only granularity tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    File,
}

/// One resolved import relationship, traceable to its source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: FileId,
    pub target: FileId,
    pub kind: EdgeKind,
    pub imported_names: Vec<String>,
    pub line_number: usize,
}

/// Types of relationships between files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `import ... from ...`
    Import,
    /// Re-exports. Reserved; builds never produce it.
    Export,
}

/// The import graph
///
/// Nodes are unique by [`FileId`]. Edges are not deduplicated: importing the
/// same file on two lines yields two edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: StableGraph<Node, Edge>,
    index: HashMap<FileId, NodeIndex>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or return the existing index if its id is already present
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.inner.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Add an edge between two known files.
    ///
    /// Returns `None` without adding anything if either endpoint is unknown
    /// or the edge is a self-import.
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeIndex> {
        if edge.source == edge.target {
            return None;
        }
        let from = *self.index.get(&edge.source)?;
        let to = *self.index.get(&edge.target)?;
        Some(self.inner.add_edge(from, to, edge))
    }

    /// Look up a node by id
    pub fn node(&self, id: &FileId) -> Option<&Node> {
        self.index
            .get(id)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_weights()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.inner.edge_weights()
    }

    /// Edges leaving `id`, in insertion order
    pub fn imports_of(&self, id: &FileId) -> Vec<&Edge> {
        self.edges_directed(id, Direction::Outgoing)
    }

    /// Edges arriving at `id`, in insertion order
    pub fn imported_by(&self, id: &FileId) -> Vec<&Edge> {
        self.edges_directed(id, Direction::Incoming)
    }

    /// The underlying petgraph, for running graph algorithms
    pub fn as_petgraph(&self) -> &StableGraph<Node, Edge> {
        &self.inner
    }

    fn edges_directed(&self, id: &FileId, direction: Direction) -> Vec<&Edge> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest-first
        let mut found: Vec<_> = self
            .inner
            .edges_directed(idx, direction)
            .map(|e| (e.id(), e.weight()))
            .collect();
        found.sort_by_key(|(edge_idx, _)| *edge_idx);
        found.into_iter().map(|(_, edge)| edge).collect()
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&Node> = self.nodes().collect();
        let edges: Vec<&Edge> = self.edges().collect();

        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}
