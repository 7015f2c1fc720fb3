//! Configuration management
//!
//! TOML configuration with validation, loaded from
//! `~/.config/ragpipe/config.toml` by default. Every section has workable
//! defaults so the pipeline runs without a config file.

use crate::chunking::{ChunkingStrategy, RecursiveChunker, SentenceChunker};
use crate::error::{RagError, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Chunking strategy selection and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// "recursive" or "sentence"
    pub strategy: String,
    /// Target chunk size in characters (soft cap)
    pub chunk_size: usize,
    /// Overlap between consecutive chunks: characters for the recursive
    /// strategy, sentences for the sentence strategy
    pub chunk_overlap: usize,
}

/// Embedding model selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
}

/// Query-time defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

/// Snapshot location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub snapshot_file: String,
}

/// Query log location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragpipe");
        Self {
            chunking: ChunkingConfig {
                strategy: "recursive".to_string(),
                chunk_size: 512,
                chunk_overlap: 100,
            },
            embedding: EmbeddingConfig {
                model: "all-MiniLM-L6-v2".to_string(),
            },
            retrieval: RetrievalConfig { top_k: 5 },
            storage: StorageConfig {
                snapshot_file: "retriever.snapshot".to_string(),
                data_dir,
            },
            logging: LoggingConfig {
                log_dir: PathBuf::from("logs"),
                prefix: String::new(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to read config file {}", path.display()),
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to write config file {}", path.display()),
        })?;
        Ok(())
    }

    /// Default config file location (`~/.config/ragpipe/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RagError::Config("Cannot determine config directory".to_string()))?;
        Ok(config_dir.join("ragpipe").join("config.toml"))
    }

    /// Validate all sections, collecting every failure.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !matches!(self.chunking.strategy.as_str(), "recursive" | "sentence") {
            errors.push(ValidationError::new(
                "chunking.strategy",
                format!(
                    "must be \"recursive\" or \"sentence\", got {:?}",
                    self.chunking.strategy
                ),
            ));
        }
        if self.chunking.chunk_size == 0 {
            errors.push(ValidationError::new(
                "chunking.chunk_size",
                "must be greater than zero",
            ));
        }
        if self.chunking.strategy == "recursive"
            && self.chunking.chunk_overlap >= self.chunking.chunk_size
        {
            errors.push(ValidationError::new(
                "chunking.chunk_overlap",
                "must be smaller than chunk_size",
            ));
        }
        if self.embedding.model.is_empty() {
            errors.push(ValidationError::new("embedding.model", "must not be empty"));
        }
        if self.retrieval.top_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.top_k",
                "must be greater than zero",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RagError::ConfigValidation { errors })
        }
    }

    /// Construct the configured chunking strategy.
    pub fn build_chunker(&self) -> Result<Box<dyn ChunkingStrategy>> {
        match self.chunking.strategy.as_str() {
            "recursive" => Ok(Box::new(RecursiveChunker::new(
                self.chunking.chunk_size,
                self.chunking.chunk_overlap,
            ))),
            "sentence" => Ok(Box::new(SentenceChunker::new(
                self.chunking.chunk_size,
                self.chunking.chunk_overlap,
            ))),
            other => Err(RagError::Config(format!(
                "Unknown chunking strategy: {other}"
            ))),
        }
    }

    /// Full path of the retriever snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.snapshot_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.chunking.chunk_size = 256;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.chunking.chunk_size, 256);
        assert_eq!(loaded.embedding.model, "all-MiniLM-L6-v2");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, RagError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_overlap_must_be_below_chunk_size() {
        let mut config = Config::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, RagError::ConfigValidation { .. }));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let mut config = Config::default();
        config.chunking.strategy = "token".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_chunker_matches_strategy() {
        let mut config = Config::default();
        assert_eq!(config.build_chunker().unwrap().name(), "recursive");

        config.chunking.strategy = "sentence".to_string();
        assert_eq!(config.build_chunker().unwrap().name(), "sentence");
    }
}
