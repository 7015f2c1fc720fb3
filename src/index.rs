//! Flat vector index with exact nearest-neighbor search
//!
//! Append-only store of fixed-dimension embedding vectors. Search is exact
//! L2 *squared* distance over every stored vector; callers wanting cosine
//! ranking must use an embedding model that produces unit-normalized
//! vectors. The ordinal position of a vector is its insertion order and is
//! the join key back into the retriever's chunk store.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    /// Vector does not match the dimensionality fixed at first insert
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Zero-length vector offered for insertion
    #[error("Zero-length vectors are not indexable")]
    ZeroDimension,

    /// IO error reading or writing a snapshot
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding or decoding failed
    #[error("Snapshot serialization error: {0}")]
    Snapshot(String),
}

/// Append-only flat index over fixed-dimension vectors.
///
/// Dimensionality is established by the first insert and never changes.
/// Snapshots capture vectors and dimensionality only (no chunk text or
/// metadata), so a restored index is only meaningful next to a chunk store
/// re-populated in the identical order (the retriever's composite snapshot
/// handles both together).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: Option<usize>,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of vectors. The first call fixes the index
    /// dimensionality; every later vector must match it.
    ///
    /// The whole batch is validated before anything is appended: a failed
    /// insert leaves the index exactly as it was.
    pub fn insert(&mut self, vectors: &[Vec<f32>]) -> Result<(), IndexError> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };

        let dimension = self.dimension.unwrap_or(first.len());
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }
        for vector in vectors {
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        self.dimension = Some(dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Exact k-nearest-neighbor search.
    ///
    /// Returns up to `k` `(ordinal, distance)` pairs in ascending distance
    /// order (ties broken by insertion order). An empty index yields an
    /// empty vec rather than an error.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(dimension)
            .enumerate()
            .map(|(ordinal, row)| {
                let distance: f32 = row
                    .iter()
                    .zip(query)
                    .map(|(a, b)| {
                        let d = a - b;
                        d * d
                    })
                    .sum();
                (ordinal, distance)
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.truncate(k);
        Ok(hits)
    }

    /// Number of vectors stored.
    pub fn len(&self) -> usize {
        match self.dimension {
            Some(d) if d > 0 => self.data.len() / d,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality fixed by the first insert, if any.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Write a binary snapshot of vectors and dimensionality.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| IndexError::Snapshot(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Restore an index from a snapshot written by [`FlatIndex::save`].
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let bytes = std::fs::read(path)?;
        let (index, _) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .map_err(|e| IndexError::Snapshot(e.to_string()))?;
        Ok(index)
    }
}
