//! Serialized forms of a [`Graph`].

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

use crate::graph::{Edge, Graph, Node};

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `{ nodes: [...], edges: [...] }`
    Json,
    /// Cytoscape element lists, every record wrapped as `{ data: ... }`
    Cytoscape,
    /// Graphviz digraph
    Dot,
}

#[derive(Serialize)]
struct Element<T> {
    data: T,
}

#[derive(Serialize)]
struct Elements<'g> {
    nodes: Vec<Element<&'g Node>>,
    edges: Vec<Element<&'g Edge>>,
}

/// Render `graph` in `format`.
pub fn render(graph: &Graph, format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(graph),
        ExportFormat::Cytoscape => serde_json::to_string_pretty(&to_cytoscape(graph)?),
        ExportFormat::Dot => Ok(to_dot(graph)),
    }
}

/// The element lists a Cytoscape view takes as `elements`
pub fn to_cytoscape(graph: &Graph) -> serde_json::Result<Value> {
    let elements = Elements {
        nodes: graph.nodes().map(|data| Element { data }).collect(),
        edges: graph.edges().map(|data| Element { data }).collect(),
    };
    serde_json::to_value(elements)
}

/// Graphviz rendering: node label = file name, edge label = imported names
pub fn to_dot(graph: &Graph) -> String {
    let mut out = String::from("digraph imports {\n");

    for node in graph.nodes() {
        let _ = writeln!(
            out,
            "    \"{}\" [label=\"{}\"];",
            escape(node.id.as_str()),
            escape(&node.label)
        );
    }
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "    \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(edge.source.as_str()),
            escape(edge.target.as_str()),
            escape(&edge.imported_names.join(", "))
        );
    }

    out.push_str("}\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
