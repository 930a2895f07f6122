//! Error types for segmentation, shaping and table loading

/// Everything that can go wrong between raw text and a glyph stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// An Arabic letter inside a run has no entry in the shaping table.
    #[error("no shaping entry for {letter:?} (U+{:04X}) at character {offset}", codepoint(.letter))]
    MissingShapingEntry { letter: char, offset: usize },

    /// The input is not valid under the expected encoding.
    #[error("malformed input at byte {offset}: {reason}")]
    MalformedInput { offset: usize, reason: String },

    /// The shaping table resource is missing or corrupt.
    #[error("failed to load shaping table: {0}")]
    ResourceLoadFailure(String),
}

impl ShapeError {
    pub(crate) fn resource(msg: impl Into<String>) -> Self {
        ShapeError::ResourceLoadFailure(msg.into())
    }
}

fn codepoint(letter: &char) -> u32 {
    *letter as u32
}

pub type Result<T> = std::result::Result<T, ShapeError>;
