//! Import statement extraction from JavaScript/TypeScript source text.
//!
//! Extraction is a deliberately narrow pattern match over one statement
//! shape, `import <clause> from '<path>'` (single or double quotes), where
//! the clause is one of:
//!
//! - `*` or `* as name` → `["*"]`
//! - a bare identifier (default import) → `[identifier]`
//! - a braced list `{ a, b }` → `["a", "b"]`
//!
//! Known gaps, kept on purpose:
//!
//! - side-effect imports (`import './polyfill'`) are not recognized
//! - `require(...)` and dynamic `import(...)` are not recognized
//! - mixed clauses (`import React, { useState } from 'react'`) are not recognized
//!
//! # Line numbers
//!
//! The reported line is the first line of the file whose text contains the
//! whole matched statement, not the line where the match starts. If the same
//! statement text also appears earlier (in a comment, say), the earlier line
//! is reported. A match spanning several lines is contained in no single
//! line; it then falls back to the line on which the match starts.
//!
//! # Example
//!
//! ```
//! use import_graph_core::import;
//!
//! let source = "import { a, b } from './lib';\nimport * as c from \"./c\";\n";
//! let records: Vec<_> = import::extract_imports(source).collect();
//!
//! assert_eq!(records[0].imported_names, vec!["a", "b"]);
//! assert_eq!(records[0].raw_module_path, "./lib");
//! assert_eq!(records[1].imported_names, vec!["*"]);
//! assert_eq!(records[1].line_number, 2);
//! ```

use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

/// Sentinel name recorded for wildcard imports
pub const WILDCARD: &str = "*";

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s*(\{[^}]+\}|\*(?:\s+as\s+\w+)?|\w+)\s*from\s+['"]([^'"]+)['"]"#)
        .expect("import pattern is a valid regex")
});

/// A single raw import statement found in a file.
///
/// Transient: produced by [`extract_imports`] and consumed by resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Names written in the import clause, or `["*"]` for a wildcard
    pub imported_names: Vec<String>,
    /// The literal module path after `from`
    pub raw_module_path: String,
    /// 1-indexed line number
    pub line_number: usize,
}

/// Lazy, single-pass iterator over the imports of one source text.
///
/// Re-scanning the same text yields identical records.
pub struct Imports<'t> {
    text: &'t str,
    captures: CaptureMatches<'static, 't>,
}

impl Iterator for Imports<'_> {
    type Item = ImportRecord;

    fn next(&mut self) -> Option<ImportRecord> {
        let caps = self.captures.next()?;
        let whole = caps.get(0)?;
        let clause = caps.get(1)?.as_str().trim();
        let module_path = caps.get(2)?.as_str();

        Some(ImportRecord {
            imported_names: parse_clause(clause),
            raw_module_path: module_path.to_string(),
            line_number: line_number_of(self.text, whole.as_str(), whole.start()),
        })
    }
}

/// Scan `text` for import statements, in source order.
pub fn extract_imports(text: &str) -> Imports<'_> {
    let pattern: &'static Regex = &IMPORT_PATTERN;
    Imports {
        text,
        captures: pattern.captures_iter(text),
    }
}

fn parse_clause(clause: &str) -> Vec<String> {
    if clause.starts_with(WILDCARD) {
        return vec![WILDCARD.to_string()];
    }

    clause
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn line_number_of(text: &str, matched: &str, offset: usize) -> usize {
    text.split('\n')
        .position(|line| line.contains(matched))
        .map(|index| index + 1)
        .unwrap_or_else(|| text[..offset].matches('\n').count() + 1)
}
