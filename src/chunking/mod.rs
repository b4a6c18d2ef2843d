//! Splitting a transcript into overlapping, fixed-size chunks.

mod character;

pub use character::split;

use serde::{Deserialize, Serialize};

/// A chunk of transcript text.
///
/// Chunks cover the document completely and in order: concatenating chunk
/// texts, skipping each chunk's `overlap` leading characters, reproduces the
/// original document exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in document order.
    pub order: i32,
    /// Text content, including any carried overlap prefix.
    pub text: String,
    /// Character offset of this chunk's first character in the document.
    pub start: usize,
    /// Number of leading characters shared with the previous chunk.
    pub overlap: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(order: i32, text: String, start: usize, overlap: usize) -> Self {
        Self {
            order,
            text,
            start,
            overlap,
        }
    }

    /// Length of this chunk in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Character range of this chunk in the document, for display.
    pub fn char_range(&self) -> String {
        format!("chars {}-{}", self.start, self.start + self.char_len())
    }
}
