//! The file set a build runs over.
//!
//! A provider enumerates candidate source files and reads them on demand.
//! [`crate::discovery::FsProvider`] walks a directory; [`MemoryProvider`]
//! serves buffers a host already holds.

use std::io;
use std::path::{Path, PathBuf};

/// Source of the files to analyse.
///
/// `files` must return a finite list of absolute paths without duplicates,
/// restricted to recognized source extensions. `read` is called once per
/// file, possibly from several worker threads at once.
pub trait FileSetProvider: Sync {
    fn files(&self) -> Vec<PathBuf>;

    /// Full text of `path`. Non-UTF-8 content is an
    /// [`io::ErrorKind::InvalidData`] error.
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Ordered in-memory file set
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: Vec<(PathBuf, String)>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Re-adding a path replaces its text and keeps its position.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let path = path.into();
        let text = text.into();
        match self.files.iter_mut().find(|(existing, _)| *existing == path) {
            Some(entry) => entry.1 = text,
            None => self.files.push((path, text)),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSetProvider for MemoryProvider {
    fn files(&self) -> Vec<PathBuf> {
        self.files.iter().map(|(path, _)| path.clone()).collect()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} is not in the file set", path.display()),
                )
            })
    }
}
