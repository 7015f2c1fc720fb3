//! Embedding provider trait and fastembed implementation

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Backend failed to initialize or respond
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// Model name not recognized by this provider
    #[error("Unknown embedding model: {0}")]
    UnknownModel(String),

    /// Returned vector does not match the model's declared dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Maps text to fixed-dimension vectors; deterministic given the same model
/// and input.
///
/// `embed_batch` must return exactly one vector per input text, in input
/// order; the retriever relies on this to keep the chunk store and the
/// vector index in lockstep.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts in one backend call.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimensionality of vectors produced by this provider.
    fn dimension(&self) -> usize;

    /// Name of the underlying model.
    fn model_name(&self) -> &str;
}

/// Local embedding via fastembed. Produces unit-normalized vectors, so L2
/// distance over them orders results the same way cosine similarity would.
///
/// Models are downloaded to the local huggingface cache on first use; the
/// default all-MiniLM-L6-v2 is ~90MB.
pub struct FastEmbedProvider {
    model: TextEmbedding,
    model_name: String,
    dimension: usize,
}

impl FastEmbedProvider {
    /// Initialize the named model. Fails with [`EmbeddingError::UnknownModel`]
    /// for unrecognized names and [`EmbeddingError::ModelUnavailable`] when
    /// the backend cannot be loaded.
    pub fn new(model_name: &str) -> Result<Self, EmbeddingError> {
        let (model, dimension) = match model_name {
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" => (EmbeddingModel::AllMiniLML6V2, 384),
            "bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
            "bge-base-en-v1.5" => (EmbeddingModel::BGEBaseENV15, 768),
            other => return Err(EmbeddingError::UnknownModel(other.to_string())),
        };

        tracing::info!("Loading embedding model {model_name} ({dimension}D)");

        let options = InitOptions::new(model).with_show_download_progress(true);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Initialize with the default model (all-MiniLM-L6-v2, 384 dimensions).
    pub fn with_default_model() -> Result<Self, EmbeddingError> {
        Self::new("all-MiniLM-L6-v2")
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::ModelUnavailable("no embedding produced".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // No filtering here: output count and order must match the input
        // exactly, empty strings included.
        let vectors = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::ModelUnavailable(e.to_string()))?;

        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
