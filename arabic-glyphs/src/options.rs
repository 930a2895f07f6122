//! Engine options
//!
//! Plain settings struct with defaults, readable from JSON so host
//! applications can keep them next to their own configuration.

use crate::error::{Result, ShapeError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Soft wrap width used by `wrap_lines` and `shape_paragraph`.
    pub max_chars_per_line: usize,
    /// Swap ASCII digits for Arabic-Indic digits in shaped output.
    pub localize_digits: bool,
    /// Shaping table to load instead of the builtin one.
    pub table_path: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_chars_per_line: 100,
            localize_digits: true,
            table_path: None,
        }
    }
}

impl EngineOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ShapeError::MalformedInput {
            offset: 0,
            reason: format!("invalid engine options: {}", e),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ShapeError::resource(format!("cannot read options {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Set the wrapping and digit options in one call.
    pub fn set_options(&mut self, max_chars_per_line: usize, localize_digits: bool) {
        self.max_chars_per_line = max_chars_per_line;
        self.localize_digits = localize_digits;
    }
}
