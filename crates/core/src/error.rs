//! Error types for graph builds.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for import-graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that abort a build or its setup.
///
/// Unresolved imports, self-imports and unsupported import forms are not
/// errors: they simply produce no edge.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The provider enumerated zero candidate files
    #[error("no source files found")]
    NoFilesFound,

    /// A file could not be read or is not valid UTF-8
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project root does not exist or cannot be canonicalized
    #[error("invalid project root {}", path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file exists but could not be read or parsed
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// An exclude pattern is not a valid glob
    #[error("invalid exclude pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The bounded worker pool could not be started
    #[error("failed to start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl GraphError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::Read {
            path: path.into(),
            source,
        }
    }
}
