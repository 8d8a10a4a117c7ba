//! Module path resolution against the set of known project files.
//!
//! Resolution is purely lexical: no filesystem access, no `package.json`,
//! no `tsconfig` path aliases. Candidates are tried in order, first hit wins:
//!
//! 1. the module path joined onto the importer's directory and normalized,
//!    looked up as an exact file id
//! 2. that candidate with a recognized extension stripped, looked up among
//!    extension-less file ids
//! 3. the candidate plus each recognized extension, in preference order
//!
//! Bare specifiers (`react`, `lodash/fp`) go through the same steps, so they
//! only resolve when a project file happens to live at that path.

use std::collections::HashMap;

use crate::graph::FileId;

/// Lookup tables built once per build and shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// Normalized path → file id
    known: HashMap<String, FileId>,
    /// Normalized path without its extension → (extension rank, file id)
    stripped: HashMap<String, (usize, FileId)>,
    /// Recognized extensions without the dot, in preference order
    extensions: Vec<String>,
}

impl ModuleResolver {
    /// Build the lookup tables for `files`.
    ///
    /// When two files differ only by extension (`a.ts`, `a.js`), the
    /// extension-less entry points at the one whose extension comes first
    /// in `extensions`, regardless of enumeration order.
    pub fn new<'a>(files: impl IntoIterator<Item = &'a FileId>, extensions: &[String]) -> Self {
        let mut known = HashMap::new();
        let mut stripped: HashMap<String, (usize, FileId)> = HashMap::new();

        for id in files {
            known.insert(id.as_str().to_string(), id.clone());

            if let Some((stem, rank)) = strip_extension(id.as_str(), extensions) {
                let preferred = stripped
                    .get(stem)
                    .is_some_and(|(existing, _)| *existing <= rank);
                if !preferred {
                    stripped.insert(stem.to_string(), (rank, id.clone()));
                }
            }
        }

        Self {
            known,
            stripped,
            extensions: extensions.to_vec(),
        }
    }

    /// Resolve `raw_module_path` as written in a file living in `importer_dir`.
    ///
    /// Returns `None` when no known file matches.
    pub fn resolve(&self, raw_module_path: &str, importer_dir: &str) -> Option<&FileId> {
        let candidate = join_module_path(importer_dir, raw_module_path);

        if let Some(id) = self.known.get(&candidate) {
            return Some(id);
        }

        let stem = strip_extension(&candidate, &self.extensions)
            .map(|(stem, _)| stem)
            .unwrap_or(candidate.as_str());
        if let Some((_, id)) = self.stripped.get(stem) {
            return Some(id);
        }

        self.extensions
            .iter()
            .find_map(|ext| self.known.get(&format!("{candidate}.{ext}")))
    }

    /// Resolve `raw_module_path` as written in the file `importer`.
    pub fn resolve_from(&self, raw_module_path: &str, importer: &FileId) -> Option<&FileId> {
        self.resolve(raw_module_path, importer.parent())
    }
}

/// Collapse `.` and `..` segments and use `/` as the only separator.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            _ => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn join_module_path(importer_dir: &str, raw_module_path: &str) -> String {
    let raw = raw_module_path.replace('\\', "/");
    if raw.starts_with('/') || importer_dir.is_empty() {
        normalize_path(&raw)
    } else {
        normalize_path(&format!("{importer_dir}/{raw}"))
    }
}

/// Split a recognized extension off `path`, returning the stem and the
/// extension's preference rank.
fn strip_extension<'p>(path: &'p str, extensions: &[String]) -> Option<(&'p str, usize)> {
    extensions.iter().enumerate().find_map(|(rank, ext)| {
        path.strip_suffix(ext.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
            .map(|stem| (stem, rank))
    })
}
