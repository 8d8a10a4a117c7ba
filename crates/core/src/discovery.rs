//! File discovery with gitignore-aware filtering
//!
//! [`FsProvider`] walks a project directory once, keeps files with a
//! recognized source extension, and serves their text from disk. Dependency
//! directories (`node_modules` by default) are pruned from the walk, and
//! extra exclusions come from glob patterns relative to the root.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::{GraphError, Result};
use crate::provider::FileSetProvider;

/// File set backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FsProvider {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FsProvider {
    /// Walk `root` and collect its source files.
    ///
    /// The returned paths are absolute, sorted and free of duplicates.
    ///
    /// # Example
    /// ```no_run
    /// use import_graph_core::{BuildConfig, FileSetProvider, FsProvider};
    ///
    /// let provider = FsProvider::discover(std::path::Path::new("my_project"), &BuildConfig::default())?;
    /// println!("Found {} files", provider.files().len());
    /// # Ok::<(), import_graph_core::GraphError>(())
    /// ```
    pub fn discover(root: &Path, config: &BuildConfig) -> Result<Self> {
        let canonical_root = root.canonicalize().map_err(|source| GraphError::InvalidRoot {
            path: root.to_path_buf(),
            source,
        })?;

        let excluded = build_glob_matcher(&config.exclude)?;
        let mut files = Vec::new();

        for result in build_walker(&canonical_root, config) {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "error walking directory");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if !has_recognized_extension(path, config) {
                continue;
            }

            // Glob patterns are written relative to the root
            if let Ok(rel_path) = path.strip_prefix(&canonical_root) {
                if excluded.is_match(rel_path) {
                    tracing::trace!(path = %path.display(), "excluded by pattern");
                    continue;
                }
            }

            files.push(entry.into_path());
        }

        files.sort();
        files.dedup();
        tracing::debug!(root = %canonical_root.display(), count = files.len(), "discovered files");

        Ok(Self {
            root: canonical_root,
            files,
        })
    }

    /// Canonicalized root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSetProvider for FsProvider {
    fn files(&self) -> Vec<PathBuf> {
        self.files.clone()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

fn has_recognized_extension(path: &Path, config: &BuildConfig) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| config.extension_rank(ext).is_some())
}

/// Build a glob matcher from the exclude patterns
fn build_glob_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| GraphError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| GraphError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Build a walker that prunes excluded directories before descending
fn build_walker(root: &Path, config: &BuildConfig) -> ignore::Walk {
    let exclude_dirs = config.exclude_dirs.clone();

    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .ignore(config.respect_gitignore)
        .require_git(false) // Read .gitignore outside git repositories too
        .hidden(false)
        .parents(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| exclude_dirs.iter().any(|d| d == name)))
        });

    builder.build()
}
