//! Character-window chunker.
//!
//! Splits on a separator first, then greedily accumulates pieces into windows
//! of at most `size` characters, carrying `overlap` characters of trailing
//! context from each window into the next.

use super::Chunk;
use crate::config::ChunkingSettings;
use crate::error::Result;
use tracing::debug;

/// Split text into overlapping chunks.
///
/// Sizes are measured in characters. Separators stay attached to the piece
/// they terminate, so no character of the input is dropped. Pieces longer
/// than `size - overlap` are hard-split at character boundaries, which keeps
/// every window within `size` characters even with a carried prefix.
///
/// Fails with a configuration error if `overlap >= size`.
pub fn split(text: &str, settings: &ChunkingSettings) -> Result<Vec<Chunk>> {
    settings.validate()?;

    if text.is_empty() {
        return Ok(Vec::new());
    }

    let size = settings.size;
    let overlap = settings.overlap;
    // A carried prefix (<= overlap) plus one piece must fit in `size`.
    let max_piece = size - overlap;
    let pieces = split_pieces(text, &settings.separator, max_piece);

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut window = String::new();
    let mut window_chars = 0usize;
    // Leading chars of `window` repeated from the previous chunk.
    let mut carry = 0usize;
    // Fresh (non-repeated) chars emitted so far.
    let mut consumed = 0usize;
    let mut order = 0i32;

    for piece in pieces {
        let piece_chars = piece.chars().count();

        if window_chars > carry && window_chars + piece_chars > size {
            chunks.push(Chunk::new(order, window.clone(), consumed - carry, carry));
            order += 1;
            consumed += window_chars - carry;

            let tail = char_tail(&window, overlap).to_string();
            carry = tail.chars().count();
            window_chars = carry;
            window = tail;
        }

        window.push_str(piece);
        window_chars += piece_chars;
    }

    if window_chars > carry {
        chunks.push(Chunk::new(order, window, consumed - carry, carry));
    }

    debug!("Split {} characters into {} chunks", text.chars().count(), chunks.len());
    Ok(chunks)
}

/// Split on the separator (kept with the preceding piece), then hard-split
/// any piece longer than `max_chars`.
fn split_pieces<'a>(text: &'a str, separator: &str, max_chars: usize) -> Vec<&'a str> {
    let base: Vec<&'a str> = if separator.is_empty() {
        vec![text]
    } else {
        text.split_inclusive(separator).collect()
    };

    let mut pieces = Vec::with_capacity(base.len());
    for piece in base {
        if piece.chars().count() <= max_chars {
            pieces.push(piece);
        } else {
            hard_split(piece, max_chars, &mut pieces);
        }
    }
    pieces
}

/// Split a piece into at-most-`max_chars` slices at character boundaries.
fn hard_split<'a>(piece: &'a str, max_chars: usize, out: &mut Vec<&'a str>) {
    let mut rest = piece;
    loop {
        match rest.char_indices().nth(max_chars) {
            Some((idx, _)) => {
                let (head, tail) = rest.split_at(idx);
                out.push(head);
                rest = tail;
            }
            None => {
                if !rest.is_empty() {
                    out.push(rest);
                }
                return;
            }
        }
    }
}

/// The last `n` characters of a string.
fn char_tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
