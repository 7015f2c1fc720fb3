//! Retrieval orchestration core
//!
//! Owns the chunk store and the vector index and keeps them in lockstep:
//! every chunk record's embedding occupies the same ordinal position in the
//! index as the record occupies in the store. Ingestion appends to both in
//! one composite operation; query maps search ordinals back to chunk
//! records and scores them.

use crate::chunking::ChunkingStrategy;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::FlatIndex;
use crate::loader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One ingested unit before chunking: raw text, or text plus arbitrary
/// passthrough metadata. Resolved into a uniform record at ingestion time
/// and kept verbatim in an append-only list for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Document {
    PlainText(String),
    WithMetadata {
        text: String,
        metadata: HashMap<String, String>,
    },
}

impl Document {
    fn parts(&self) -> (&str, Option<&HashMap<String, String>>) {
        match self {
            Document::PlainText(text) => (text, None),
            Document::WithMetadata { text, metadata } => (text, Some(metadata)),
        }
    }
}

/// A contiguous span of text from one source document plus that document's
/// metadata. Immutable once created; identity is its ordinal position in
/// the chunk store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

/// One entry of a query result: chunk text, its metadata, and a similarity
/// score in (0, 1]. Ephemeral, produced per query.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub metadata: HashMap<String, String>,
    pub score: f32,
}

/// Successful ingestion of a single file.
#[derive(Debug, Clone)]
pub struct FileIngest {
    pub path: PathBuf,
    pub chunks: usize,
}

/// Per-file outcome of a directory ingestion: the batch never aborts on a
/// single file's failure, so callers observe each file's result here.
pub type FileOutcome = std::result::Result<FileIngest, (PathBuf, RagError)>;

/// Composite snapshot: chunk store, document list and vector index in one
/// blob, so a restore can never leave the two stores out of sync.
#[derive(Serialize, Deserialize)]
struct RetrieverSnapshot {
    chunks: Vec<ChunkRecord>,
    documents: Vec<Document>,
    index: FlatIndex,
}

/// Orchestrates chunking, embedding, indexing and query-time scoring.
///
/// Single-threaded and synchronous: all `add_*` operations take `&mut self`,
/// so concurrent mutation is unrepresentable. Embedding calls are blocking
/// and are the dominant latency cost; there is no retry logic anywhere in
/// the pipeline; failures propagate to the caller immediately.
pub struct Retriever {
    chunker: Box<dyn ChunkingStrategy>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: FlatIndex,
    chunks: Vec<ChunkRecord>,
    documents: Vec<Document>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.chunks.len())
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}

impl Retriever {
    pub fn new(chunker: Box<dyn ChunkingStrategy>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            chunker,
            embedder,
            index: FlatIndex::new(),
            chunks: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Ingest a batch of documents. Returns the number of new chunks.
    ///
    /// All new chunk texts are embedded in one backend call, not one call
    /// per chunk. If the backend returns a different vector count the whole
    /// call aborts with [`RagError::EmbeddingCountMismatch`] and nothing is
    /// appended, keeping chunk store and index in lockstep.
    pub fn add_documents(&mut self, documents: Vec<Document>) -> Result<usize> {
        let mut new_records = Vec::new();
        let mut new_texts = Vec::new();

        for document in &documents {
            let (text, metadata) = document.parts();
            let metadata = metadata.cloned().unwrap_or_default();
            for chunk in self.chunker.split(text) {
                new_records.push(ChunkRecord {
                    text: chunk.clone(),
                    metadata: metadata.clone(),
                });
                new_texts.push(chunk);
            }
        }

        if !new_texts.is_empty() {
            let embeddings = self.embedder.embed_batch(&new_texts)?;
            if embeddings.len() != new_texts.len() {
                return Err(RagError::EmbeddingCountMismatch {
                    expected: new_texts.len(),
                    actual: embeddings.len(),
                });
            }

            self.index.insert(&embeddings)?;
            self.chunks.extend(new_records);
        }

        tracing::debug!(
            documents = documents.len(),
            chunks = new_texts.len(),
            "ingested documents"
        );

        self.documents.extend(documents);
        Ok(new_texts.len())
    }

    /// Load one file, normalize its text, attach `source = path` to the
    /// supplied metadata and ingest it.
    pub fn add_file(&mut self, path: &Path, metadata: HashMap<String, String>) -> Result<usize> {
        let text = loader::normalize_text(&loader::load_document(path)?);

        let mut metadata = metadata;
        metadata.insert("source".to_string(), path.display().to_string());

        self.add_documents(vec![Document::WithMetadata { text, metadata }])
    }

    /// Ingest every file in `dir` matching `pattern` (non-recursive glob,
    /// `*` matches all files).
    ///
    /// Partial-success semantics: a failing file is logged and reported in
    /// its slot of the returned vec, and the batch continues.
    pub fn add_directory(&mut self, dir: &Path, pattern: &str) -> Result<Vec<FileOutcome>> {
        let full_pattern = dir.join(pattern).display().to_string();
        let paths = glob::glob(&full_pattern).map_err(|e| RagError::Pattern {
            pattern: full_pattern.clone(),
            source: e,
        })?;

        let mut outcomes = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    let path = e.path().to_path_buf();
                    tracing::warn!("Skipping unreadable path {}: {e}", path.display());
                    outcomes.push(Err((
                        path.clone(),
                        RagError::Io {
                            source: e.into_error(),
                            context: format!("Failed to access {}", path.display()),
                        },
                    )));
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            match self.add_file(&path, HashMap::new()) {
                Ok(chunks) => {
                    tracing::info!("Processed {} ({chunks} chunks)", path.display());
                    outcomes.push(Ok(FileIngest { path, chunks }));
                }
                Err(e) => {
                    tracing::warn!("Failed to process {}: {e}", path.display());
                    outcomes.push(Err((path, e)));
                }
            }
        }

        Ok(outcomes)
    }

    /// Retrieve the `k` chunks most similar to `text`, highest score first.
    ///
    /// Scores are `1 / (1 + distance)`, mapping L2 distance into (0, 1].
    /// An empty index yields an empty vec, never an error.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        // Single-item batch: the query goes through the same batching
        // contract as ingestion.
        let mut embeddings = self.embedder.embed_batch(&[text.to_string()])?;
        if embeddings.len() != 1 {
            return Err(RagError::EmbeddingCountMismatch {
                expected: 1,
                actual: embeddings.len(),
            });
        }
        let query_vector = embeddings.remove(0);

        let hits = self.index.search(&query_vector, k)?;

        let mut results = Vec::with_capacity(hits.len());
        for (ordinal, distance) in hits {
            let record = self
                .chunks
                .get(ordinal)
                .ok_or(RagError::StoreDesync { ordinal })?;
            results.push(RetrievedChunk {
                text: record.text.clone(),
                metadata: record.metadata.clone(),
                score: 1.0 / (1.0 + distance),
            });
        }

        // The transform is monotonic, so this matches the index's ascending
        // distance order; kept as the ranking contract in case scoring
        // ever becomes non-monotonic.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(results)
    }

    /// Number of chunk records in the store.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of vectors in the index. Equal to [`Self::chunk_count`] at
    /// every observation point.
    pub fn index_size(&self) -> usize {
        self.index.len()
    }

    /// Number of documents ingested so far.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Write chunk store, documents and index as one binary snapshot.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = RetrieverSnapshot {
            chunks: self.chunks.clone(),
            documents: self.documents.clone(),
            index: self.index.clone(),
        };

        let bytes = bincode::serde::encode_to_vec(&snapshot, bincode::config::standard())
            .map_err(|e| RagError::Snapshot {
                context: format!("Failed to encode snapshot for {}", path.display()),
                message: e.to_string(),
            })?;
        std::fs::write(path, bytes).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to write snapshot {}", path.display()),
        })?;
        Ok(())
    }

    /// Restore a retriever from a snapshot written by
    /// [`Self::save_snapshot`], re-attaching a chunker and an embedder.
    ///
    /// Fails if the snapshot violates the lockstep invariant or if the
    /// index dimensionality does not match the supplied embedder.
    pub fn load_snapshot(
        path: &Path,
        chunker: Box<dyn ChunkingStrategy>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to read snapshot {}", path.display()),
        })?;
        let (snapshot, _): (RetrieverSnapshot, _) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).map_err(
                |e| RagError::Snapshot {
                    context: format!("Failed to decode snapshot {}", path.display()),
                    message: e.to_string(),
                },
            )?;

        if snapshot.chunks.len() != snapshot.index.len() {
            return Err(RagError::Snapshot {
                context: path.display().to_string(),
                message: format!(
                    "snapshot holds {} chunks but {} vectors",
                    snapshot.chunks.len(),
                    snapshot.index.len()
                ),
            });
        }

        if let Some(dimension) = snapshot.index.dimension() {
            if dimension != embedder.dimension() {
                return Err(RagError::Snapshot {
                    context: path.display().to_string(),
                    message: format!(
                        "snapshot dimension {dimension} does not match embedding model ({})",
                        embedder.dimension()
                    ),
                });
            }
        }

        Ok(Self {
            chunker,
            embedder,
            index: snapshot.index,
            chunks: snapshot.chunks,
            documents: snapshot.documents,
        })
    }
}
