//! Sentence-aware chunking

use super::ChunkingStrategy;

/// Splits text at sentence boundaries and greedily accumulates sentences
/// into chunks under a character budget.
///
/// `overlap` is counted in *sentences*: when a chunk closes, its last
/// `overlap` sentences seed the next chunk. The budget is a soft cap: a
/// single sentence longer than `chunk_size` still becomes its own chunk,
/// sentences are never split mid-way.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    chunk_size: usize,
    overlap: usize,
}

impl SentenceChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(512, 50)
    }
}

impl ChunkingStrategy for SentenceChunker {
    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0usize;

        for sentence in split_sentences(text) {
            let sentence_len = sentence.chars().count();

            if current_len + sentence_len > self.chunk_size && !current.is_empty() {
                chunks.push(current.join(" "));

                if self.overlap == 0 {
                    current.clear();
                } else if self.overlap < current.len() {
                    current.drain(..current.len() - self.overlap);
                }
                current_len = current.iter().map(|s| s.chars().count()).sum();
            }

            current_len += sentence_len;
            current.push(sentence);
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        chunks
    }

    fn name(&self) -> &'static str {
        "sentence"
    }
}

/// Split text into sentence-like units at `.`, `!` or `?` followed by
/// whitespace. Terminators stay attached to their sentence; the whitespace
/// run between sentences is consumed.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.trim().is_empty() {
        sentences.push(current);
    }

    sentences
}
