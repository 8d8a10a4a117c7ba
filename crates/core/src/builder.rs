//! Graph assembly
//!
//! A build is one pass over the provider's files:
//!
//! 1. enumerate files and create one node per file
//! 2. build the resolver's lookup tables from the complete file list
//! 3. per file (in parallel): read, extract imports, resolve each one
//! 4. append edges in file order, then extraction order
//!
//! Steps 1-2 finish before any file is read, so every import can resolve
//! to any file regardless of scan order. Workers only read shared state and
//! return their edges; the concatenation order is fixed by the file list,
//! so the result is the same for any worker count.

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::{GraphError, Result};
use crate::graph::{Edge, EdgeKind, FileId, Graph, Node};
use crate::import::extract_imports;
use crate::provider::FileSetProvider;
use crate::resolve::ModuleResolver;

/// Build the import graph for `provider` with the default configuration.
///
/// # Errors
///
/// - [`GraphError::NoFilesFound`] if the provider yields no files
/// - [`GraphError::Read`] for the first file (in enumeration order) that
///   cannot be read; no partial graph is returned
///
/// # Example
///
/// ```
/// use import_graph_core::{build_graph, MemoryProvider};
///
/// let provider = MemoryProvider::new()
///     .with_file("/p/x.ts", "import { f } from './y'")
///     .with_file("/p/y.ts", "export function f() {}");
///
/// let graph = build_graph(&provider)?;
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// # Ok::<(), import_graph_core::GraphError>(())
/// ```
pub fn build_graph<P: FileSetProvider + ?Sized>(provider: &P) -> Result<Graph> {
    build_graph_with(provider, &BuildConfig::default())
}

/// Build the import graph for `provider` using `config`'s extension
/// preference order and worker count.
pub fn build_graph_with<P: FileSetProvider + ?Sized>(
    provider: &P,
    config: &BuildConfig,
) -> Result<Graph> {
    let files = unique_files(provider.files());
    if files.is_empty() {
        return Err(GraphError::NoFilesFound);
    }

    let mut graph = Graph::new();
    for (_, id) in &files {
        graph.add_node(Node::file(id.clone()));
    }

    let resolver = ModuleResolver::new(files.iter().map(|(_, id)| id), &config.extensions);

    let per_file = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(|| scan_files(provider, &resolver, &files)),
        None => scan_files(provider, &resolver, &files),
    };

    for edges in per_file {
        for edge in edges? {
            graph.add_edge(edge);
        }
    }

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "import graph built"
    );

    Ok(graph)
}

/// Pair each path with its id, dropping repeats of an id already seen
fn unique_files(paths: Vec<PathBuf>) -> Vec<(PathBuf, FileId)> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .map(|path| {
            let id = FileId::from_path(&path);
            (path, id)
        })
        .filter(|(_, id)| seen.insert(id.clone()))
        .collect()
}

fn scan_files<P: FileSetProvider + ?Sized>(
    provider: &P,
    resolver: &ModuleResolver,
    files: &[(PathBuf, FileId)],
) -> Vec<Result<Vec<Edge>>> {
    files
        .par_iter()
        .map(|(path, id)| file_edges(provider, resolver, path, id))
        .collect()
}

/// Read one file and turn its resolvable imports into edges
fn file_edges<P: FileSetProvider + ?Sized>(
    provider: &P,
    resolver: &ModuleResolver,
    path: &Path,
    id: &FileId,
) -> Result<Vec<Edge>> {
    let text = provider
        .read(path)
        .map_err(|source| GraphError::read(path, source))?;

    let mut edges = Vec::new();
    for record in extract_imports(&text) {
        match resolver.resolve_from(&record.raw_module_path, id) {
            Some(target) if target == id => {
                tracing::debug!(file = %id, line = record.line_number, "dropping self-import");
            }
            Some(target) => {
                tracing::debug!(
                    file = %id,
                    module = %record.raw_module_path,
                    target = %target,
                    "resolved import"
                );
                edges.push(Edge {
                    source: id.clone(),
                    target: target.clone(),
                    kind: EdgeKind::Import,
                    imported_names: record.imported_names,
                    line_number: record.line_number,
                });
            }
            None => {
                tracing::debug!(
                    file = %id,
                    module = %record.raw_module_path,
                    line = record.line_number,
                    "unresolved import"
                );
            }
        }
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use pretty_assertions::assert_eq;
    use std::io;

    fn ids(graph: &Graph) -> Vec<&str> {
        graph.nodes().map(|n| n.id.as_str()).collect()
    }

    fn endpoints(graph: &Graph) -> Vec<(&str, &str)> {
        graph
            .edges()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    #[test]
    fn test_named_import_edge() {
        let provider = MemoryProvider::new()
            .with_file("/p/x.ts", "import { f } from './y'")
            .with_file("/p/y.ts", "export function f(){}");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(ids(&graph), vec!["/p/x.ts", "/p/y.ts"]);
        let labels: Vec<&str> = graph.nodes().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["x.ts", "y.ts"]);
        let edges: Vec<&Edge> = graph.edges().collect();
        assert_eq!(
            edges,
            vec![&Edge {
                source: FileId::new("/p/x.ts"),
                target: FileId::new("/p/y.ts"),
                kind: EdgeKind::Import,
                imported_names: vec!["f".to_string()],
                line_number: 1,
            }]
        );
    }

    #[test]
    fn test_missing_target_produces_no_edge() {
        let provider = MemoryProvider::new().with_file("/p/x.ts", "import { f } from './missing'");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_wildcard_import_edge() {
        let provider = MemoryProvider::new()
            .with_file("/p/x.ts", "import * as lib from './y'")
            .with_file("/p/y.ts", "");

        let graph = build_graph(&provider).unwrap();

        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.imported_names, vec!["*"]);
    }

    #[test]
    fn test_empty_file_set() {
        let err = build_graph(&MemoryProvider::new()).unwrap_err();

        assert!(matches!(err, GraphError::NoFilesFound));
    }

    #[test]
    fn test_mutual_imports_are_two_edges() {
        let provider = MemoryProvider::new()
            .with_file("/p/a.ts", "import { b } from './b'")
            .with_file("/p/b.ts", "import { a } from './a'");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(
            endpoints(&graph),
            vec![("/p/a.ts", "/p/b.ts"), ("/p/b.ts", "/p/a.ts")]
        );
    }

    #[test]
    fn test_files_without_imports() {
        let provider = MemoryProvider::new()
            .with_file("/p/a.ts", "export const a = 1;")
            .with_file("/p/lib/b.js", "module.exports = {};")
            .with_file("/p/c.ts", "");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(ids(&graph), vec!["/p/a.ts", "/p/lib/b.js", "/p/c.ts"]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_relative_paths_resolve_at_top_level() {
        let provider = MemoryProvider::new()
            .with_file("x.ts", "import { f } from './y'")
            .with_file("y.ts", "export function f(){}")
            .with_file("src/z.ts", "import { f } from '../y'");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(endpoints(&graph), vec![("x.ts", "y.ts"), ("src/z.ts", "y.ts")]);
    }

    #[test]
    fn test_empty_brace_clause_keeps_edge_without_names() {
        let provider = MemoryProvider::new()
            .with_file("/p/x.ts", "import { } from './y'")
            .with_file("/p/y.ts", "");

        let graph = build_graph(&provider).unwrap();

        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.target.as_str(), "/p/y.ts");
        assert!(edge.imported_names.is_empty());
    }

    #[test]
    fn test_self_imports_are_dropped() {
        let provider = MemoryProvider::new().with_file(
            "/p/src/a.ts",
            "import { a } from './a';\nimport * as me from '../src/a.ts';\n",
        );

        let graph = build_graph(&provider).unwrap();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_repeated_imports_keep_each_line() {
        let provider = MemoryProvider::new()
            .with_file("/p/a.ts", "import { x } from './b';\nimport { y } from './b';\n")
            .with_file("/p/b.ts", "");

        let graph = build_graph(&provider).unwrap();

        let lines: Vec<usize> = graph.edges().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_resolution_sees_files_later_in_order() {
        let provider = MemoryProvider::new()
            .with_file("/p/a.ts", "import z from './nested/z'")
            .with_file("/p/nested/z.js", "import a from '../a'");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(
            endpoints(&graph),
            vec![("/p/a.ts", "/p/nested/z.js"), ("/p/nested/z.js", "/p/a.ts")]
        );
    }

    #[test]
    fn test_extension_preference_is_deterministic() {
        let forward = MemoryProvider::new()
            .with_file("/p/main.ts", "import a from './a'")
            .with_file("/p/a.ts", "")
            .with_file("/p/a.js", "");
        let backward = MemoryProvider::new()
            .with_file("/p/a.js", "")
            .with_file("/p/a.ts", "")
            .with_file("/p/main.ts", "import a from './a'");

        for provider in [forward, backward] {
            let graph = build_graph(&provider).unwrap();
            assert_eq!(endpoints(&graph), vec![("/p/main.ts", "/p/a.ts")]);
        }
    }

    #[test]
    fn test_bare_specifiers_are_dropped() {
        let provider = MemoryProvider::new()
            .with_file("/p/a.ts", "import React from 'react';\nimport { b } from './b';\n")
            .with_file("/p/b.ts", "");

        let graph = build_graph(&provider).unwrap();

        assert_eq!(endpoints(&graph), vec![("/p/a.ts", "/p/b.ts")]);
        assert_eq!(graph.edges().next().unwrap().line_number, 2);
    }

    #[test]
    fn test_duplicate_paths_are_scanned_once() {
        struct Repeating(MemoryProvider);

        impl FileSetProvider for Repeating {
            fn files(&self) -> Vec<PathBuf> {
                let mut files = self.0.files();
                files.extend(self.0.files());
                files
            }

            fn read(&self, path: &Path) -> io::Result<String> {
                self.0.read(path)
            }
        }

        let provider = Repeating(
            MemoryProvider::new()
                .with_file("/p/a.ts", "import b from './b'")
                .with_file("/p/b.ts", ""),
        );

        let graph = build_graph(&provider).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_read_failure_aborts_build() {
        struct Unreadable;

        impl FileSetProvider for Unreadable {
            fn files(&self) -> Vec<PathBuf> {
                vec![PathBuf::from("/p/ok.ts"), PathBuf::from("/p/locked.ts")]
            }

            fn read(&self, path: &Path) -> io::Result<String> {
                if path.ends_with("locked.ts") {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                } else {
                    Ok("import l from './locked'".to_string())
                }
            }
        }

        let err = build_graph(&Unreadable).unwrap_err();

        match err {
            GraphError::Read { path, source } => {
                assert_eq!(path, PathBuf::from("/p/locked.ts"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("Expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn test_worker_count_does_not_change_output() {
        let mut provider = MemoryProvider::new();
        for i in 0..40 {
            let text = format!(
                "import {{ f{i} }} from './m{}';\nimport * as all from './m{}';\n",
                (i + 1) % 40,
                (i + 7) % 40
            );
            provider.insert(format!("/p/m{i}.ts"), text);
        }

        let sequential = BuildConfig {
            threads: Some(1),
            ..BuildConfig::default()
        };
        let parallel = BuildConfig {
            threads: Some(8),
            ..BuildConfig::default()
        };

        let one = build_graph_with(&provider, &sequential).unwrap();
        let many = build_graph_with(&provider, &parallel).unwrap();
        let global = build_graph(&provider).unwrap();

        let one_edges: Vec<&Edge> = one.edges().collect();
        let many_edges: Vec<&Edge> = many.edges().collect();
        let global_edges: Vec<&Edge> = global.edges().collect();
        assert_eq!(one_edges.len(), 80);
        assert_eq!(one_edges, many_edges);
        assert_eq!(one_edges, global_edges);
    }
}
