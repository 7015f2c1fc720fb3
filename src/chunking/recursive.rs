//! Recursive character chunking

use super::ChunkingStrategy;
use std::collections::VecDeque;

/// Separators tried from coarsest to finest. The empty separator is a hard
/// character split and guarantees every piece ends up under the budget.
const SEPARATORS: &[&str] = &["\n\n", "\n", ".", "!", "?", ",", " ", ""];

/// Splits text by recursively descending an ordered separator list.
///
/// The text is split at the coarsest separator first; only pieces still
/// exceeding `chunk_size` are re-split at the next finer separator, down to
/// a hard per-character split. Pieces are then merged greedily into chunks,
/// carrying up to `overlap` *characters* of trailing context into each
/// following chunk. This is the default ingestion-path strategy.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    overlap: usize,
}

impl RecursiveChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Break text into pieces no longer than `chunk_size`, preferring the
    /// coarsest separator that gets the job done. Separators stay attached
    /// to the end of their piece so concatenation reproduces the input.
    fn decompose(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((sep, finer)) = separators.split_first() else {
            return vec![text.to_string()];
        };

        if sep.is_empty() {
            let chars: Vec<char> = text.chars().collect();
            return chars
                .chunks(self.chunk_size)
                .map(|c| c.iter().collect())
                .collect();
        }

        if !text.contains(sep) {
            return self.decompose(text, finer);
        }

        let mut pieces = Vec::new();
        for part in text.split_inclusive(sep) {
            if part.chars().count() > self.chunk_size {
                pieces.extend(self.decompose(part, finer));
            } else {
                pieces.push(part.to_string());
            }
        }
        pieces
    }

    /// Greedily merge pieces into chunks under the budget. When a chunk
    /// closes, whole trailing pieces totalling at most `overlap` characters
    /// are retained as the seed of the next chunk.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<String> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let piece_len = piece.chars().count();

            if total + piece_len > self.chunk_size && !window.is_empty() {
                let chunk: String = window.iter().map(String::as_str).collect();
                let chunk = chunk.trim().to_string();
                if !chunk.is_empty() {
                    chunks.push(chunk);
                }

                // Shrink the window until it both fits the overlap budget
                // and leaves room for the incoming piece.
                while total > self.overlap || (total + piece_len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some(front) => total -= front.chars().count(),
                        None => break,
                    }
                }
            }

            total += piece_len;
            window.push_back(piece);
        }

        let tail: String = window.iter().map(String::as_str).collect();
        let tail = tail.trim().to_string();
        if !tail.is_empty() {
            chunks.push(tail);
        }

        chunks
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new(512, 100)
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let pieces = self.decompose(text, SEPARATORS);
        self.merge(pieces)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
