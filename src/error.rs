use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;
use crate::index::IndexError;

/// Main error type for the ragpipe crate
#[derive(Error, Debug)]
pub enum RagError {
    /// File extension not recognized by the document loader
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// Format-specific parsing failed for a supported file type
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// Invalid glob pattern supplied to directory ingestion
    #[error("Invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// The embedding backend returned a different number of vectors than
    /// chunk texts it was given. Tolerating this would desynchronize the
    /// chunk store and the vector index, so the ingestion call is aborted.
    #[error("Embedding returned {actual} vectors for {expected} chunks")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    /// A search hit points at an ordinal with no chunk record behind it
    #[error("Chunk store and vector index are out of sync at ordinal {ordinal}")]
    StoreDesync { ordinal: usize },

    /// Snapshot serialization or deserialization failed
    #[error("Snapshot error: {context}: {message}")]
    Snapshot { context: String, message: String },

    /// Embedding backend errors
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Generation backend errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for ragpipe operations
pub type Result<T> = std::result::Result<T, RagError>;
