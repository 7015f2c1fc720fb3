//! Text chunking strategies
//!
//! Splitting policy is pluggable: the retriever only depends on the
//! [`ChunkingStrategy`] contract and is agnostic to which strategy produced
//! the chunks. Two strategies are provided:
//! - [`SentenceChunker`]: greedy sentence accumulation, overlap counted in
//!   sentences
//! - [`RecursiveChunker`]: ordered separator descent, overlap counted in
//!   characters (the default ingestion path)

mod recursive;
mod sentence;

pub use recursive::RecursiveChunker;
pub use sentence::SentenceChunker;

/// A chunking policy: splits text into an ordered sequence of chunk strings.
///
/// Chunk *text* may overlap between neighbors; chunk *identity* never does:
/// each returned string becomes its own record in the chunk store. Output
/// must be fully deterministic given identical input and parameters.
pub trait ChunkingStrategy: Send + Sync {
    /// Split `text` into ordered chunks. Empty input yields an empty vec.
    fn split(&self, text: &str) -> Vec<String>;

    /// Short name of the strategy, used in logs and config.
    fn name(&self) -> &'static str;
}
