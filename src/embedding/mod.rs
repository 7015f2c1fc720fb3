//! Embedding generation
//!
//! The retriever depends only on the [`EmbeddingProvider`] contract. The
//! capability object is constructed explicitly (model loading is expensive)
//! and passed into the retriever by `Arc`; there is no lazy global
//! singleton.

mod provider;

pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
