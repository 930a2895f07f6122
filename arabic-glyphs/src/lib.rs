//! Arabic Glyphs
//!
//! Rewrites the Arabic runs of mixed-direction text into visually ordered
//! presentation-form codepoints, for renderers and document generators that
//! draw codepoints literally, left to right, without shaping or bidi support.

pub mod assembler;
pub mod engine;
pub mod entity;
pub mod error;
pub mod options;
pub mod segmenter;
pub mod shaper;
pub mod table;
pub mod wrap;

// Re-export commonly used functions and types
pub use assembler::{localize_digits, process, process_lines};
pub use engine::Engine;
pub use error::{Result, ShapeError};
pub use options::EngineOptions;
pub use segmenter::{find_runs, find_runs_bytes, Run};
pub use shaper::shape;
pub use table::{GlyphForm, ShapingEntry, ShapingTable};
pub use wrap::wrap as wrap_lines;

/// Shape one line with the builtin table: segment, shape, reverse word order
/// and localize digits.
pub fn shape_to_glyphs(text: &str) -> Result<String> {
    let table = ShapingTable::shared()?;
    process(&table, text)
}
