//! Ragpipe - Retrieval-Augmented Generation reference pipeline
//!
//! Ingests documents, splits them into overlapping chunks, embeds and indexes
//! the chunks for semantic search, and retrieves the top-k chunks relevant to
//! a question so a text-generation model can produce a grounded answer.

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod logger;
pub mod pipeline;
pub mod retriever;

pub use error::{RagError, Result};
