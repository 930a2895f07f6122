//! Engine facade
//!
//! Owns one immutable shaping table and the options, and exposes the public
//! operations. An engine is cheap to clone and safe to share across threads.

use crate::assembler;
use crate::error::Result;
use crate::options::EngineOptions;
use crate::segmenter;
use crate::table::ShapingTable;
use crate::wrap;
use log::debug;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Engine {
    table: Arc<ShapingTable>,
    options: EngineOptions,
}

impl Engine {
    /// Engine over the builtin table with default options.
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: ShapingTable::shared()?,
            options: EngineOptions::default(),
        })
    }

    pub fn with_table(table: ShapingTable) -> Self {
        Self {
            table: Arc::new(table),
            options: EngineOptions::default(),
        }
    }

    /// Engine for `options`, loading `options.table_path` when set.
    pub fn with_options(options: EngineOptions) -> Result<Self> {
        let table = match &options.table_path {
            Some(path) => Arc::new(ShapingTable::from_path(path)?),
            None => ShapingTable::shared()?,
        };
        debug!(
            "Engine ready: {} table entries, wrap at {}, localize digits {}",
            table.len(),
            options.max_chars_per_line,
            options.localize_digits
        );
        Ok(Self { table, options })
    }

    /// Read options from a JSON file and build the engine they describe.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(EngineOptions::from_path(path)?)
    }

    pub fn table(&self) -> &ShapingTable {
        &self.table
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut EngineOptions {
        &mut self.options
    }

    /// Alternating start/end byte offsets of the Arabic runs in `text`.
    pub fn find_runs(&self, text: &str) -> Vec<usize> {
        segmenter::find_runs(text)
    }

    /// Shape, reorder and (unless disabled) localize the digits of one line.
    pub fn shape_to_glyphs(&self, text: &str) -> Result<String> {
        let reordered = assembler::reorder(&self.table, text)?;
        if self.options.localize_digits {
            Ok(assembler::localize_digits(&reordered))
        } else {
            Ok(reordered)
        }
    }

    /// Wrap using the configured line width.
    pub fn wrap_lines(&self, text: &str) -> Vec<String> {
        wrap::wrap(text, self.options.max_chars_per_line)
    }

    pub fn localize_digits(&self, text: &str) -> String {
        assembler::localize_digits(text)
    }

    /// Wrap logical text first, then shape each resulting line.
    pub fn shape_paragraph(&self, text: &str) -> Result<Vec<String>> {
        let lines = self.wrap_lines(text);
        debug!("shape_paragraph: {} lines", lines.len());
        lines.iter().map(|line| self.shape_to_glyphs(line)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_with_builtin_table() {
        let engine = Engine::new().unwrap();
        assert_eq!(engine.shape_to_glyphs("ب 12").unwrap(), "١٢ \u{FE8F}");
    }

    #[test]
    fn digit_localization_can_be_disabled() {
        let mut engine = Engine::new().unwrap();
        engine.options_mut().localize_digits = false;
        assert_eq!(engine.shape_to_glyphs("ب 12").unwrap(), "12 \u{FE8F}");
    }

    #[test]
    fn paragraph_is_wrapped_then_shaped() {
        let mut engine = Engine::new().unwrap();
        engine.options_mut().max_chars_per_line = 4;
        let lines = engine.shape_paragraph("ب ب ب ب").unwrap();
        assert_eq!(lines, vec!["\u{FE8F} \u{FE8F}", "\u{FE8F} \u{FE8F}"]);
    }

    #[test]
    fn missing_table_file_fails_fast() {
        let options = EngineOptions {
            table_path: Some("/nonexistent/table.json".into()),
            ..EngineOptions::default()
        };
        assert!(Engine::with_options(options).is_err());
    }
}
