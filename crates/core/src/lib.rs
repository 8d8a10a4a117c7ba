//! Import Graph Core Library
//!
//! Builds a file-level dependency graph for JavaScript/TypeScript projects:
//! one node per source file, one edge per `import ... from '...'` statement
//! that resolves to another file of the project.
//!
//! The pipeline is [`provider`] → [`import`] → [`resolve`] → [`builder`];
//! [`export`] renders the result.

pub mod builder;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod graph;
pub mod import;
pub mod provider;
pub mod resolve;

// Re-export commonly used types
pub use builder::{build_graph, build_graph_with};
pub use config::BuildConfig;
pub use discovery::FsProvider;
pub use error::{GraphError, Result};
pub use export::ExportFormat;
pub use graph::{Edge, EdgeKind, FileId, Graph, Node, NodeKind};
pub use import::ImportRecord;
pub use provider::{FileSetProvider, MemoryProvider};
pub use resolve::ModuleResolver;
