//! Build configuration
//!
//! Loaded from `import-graph.toml` at the project root. Every field has a
//! default, so an absent file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GraphError, Result};

/// File name looked up at the project root by [`BuildConfig::load`]
pub const CONFIG_FILE_NAME: &str = "import-graph.toml";

/// Settings shared by discovery, resolution and the build itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Recognized source extensions (without the dot), in resolution
    /// preference order
    pub extensions: Vec<String>,
    /// Directory names whose subtrees are never enumerated
    pub exclude_dirs: Vec<String>,
    /// Extra glob patterns, relative to the root, excluded from discovery
    pub exclude: Vec<String>,
    /// Worker count for per-file processing (`None` = rayon's global pool)
    pub threads: Option<usize>,
    /// Honour `.gitignore` files while walking
    pub respect_gitignore: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["ts".to_string(), "js".to_string()],
            exclude_dirs: vec!["node_modules".to_string()],
            exclude: Vec::new(),
            threads: None,
            respect_gitignore: true,
        }
    }
}

impl BuildConfig {
    /// Load `import-graph.toml` from `root`, or defaults if there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load configuration from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| GraphError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|err| GraphError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        for ext in &mut config.extensions {
            *ext = ext.trim_start_matches('.').to_string();
        }
        Ok(config)
    }

    /// Position of `ext` in the preference order, if it is recognized
    pub fn extension_rank(&self, ext: &str) -> Option<usize> {
        self.extensions.iter().position(|e| e == ext)
    }
}
