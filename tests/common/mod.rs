//! Shared test doubles for integration tests.

use ragpipe::embedding::{EmbeddingError, EmbeddingProvider};
use ragpipe::generation::{GenerationError, GenerationModel};

const DIM: usize = 64;

/// Deterministic bag-of-words embedder: each token is hashed into one of
/// `DIM` slots, then the vector is L2-normalized. Texts sharing words land
/// close together, which is all the retrieval tests need.
pub struct HashEmbedder;

fn token_slot(token: &str) -> usize {
    // FNV-1a over the lowercased token
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.to_lowercase().bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIM as u64) as usize
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut v = vec![0.0f32; DIM];
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            v[token_slot(token)] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn model_name(&self) -> &str {
        "hash-test"
    }
}

/// Generation model returning a fixed answer, recording nothing.
pub struct CannedModel {
    pub answer: String,
}

impl CannedModel {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
        }
    }
}

impl GenerationModel for CannedModel {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.answer.clone())
    }

    fn model_name(&self) -> &str {
        "canned-test"
    }
}
