use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::pattern::{IgnoreSet, DEFAULT_IGNORE_PATTERNS};

/// Why a config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// User-tunable explorer settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Globs of field names dropped during normalization.
    pub ignore_patterns: Vec<String>,
    /// Columns listed first in the table, in this order.
    pub default_column_order: Vec<String>,
    /// Columns visible right after loading.
    pub default_visible_columns: Vec<String>,
    /// Show range sliders next to the numeric inputs.
    pub show_sliders: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            default_column_order: to_strings(&[
                "name",
                "cost",
                "mass",
                "outfit space",
                "engine capacity",
                "thrust",
                "turn",
                "turning energy",
                "turning heat",
                "slowing resistance",
                "frame rate",
                "source",
            ]),
            default_visible_columns: to_strings(&[
                "name",
                "cost",
                "mass",
                "outfit space",
                "engine capacity",
                "thrust",
                "thrusting energy",
                "thrusting heat",
                "turn",
                "turning energy",
                "turning heat",
                "reverse thrust",
                "reverse thrusting energy",
                "reverse thrusting heat",
            ]),
            show_sliders: false,
        }
    }
}

impl ExplorerConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::new(&self.ignore_patterns)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
