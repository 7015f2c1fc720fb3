//! Answer generation collaborator
//!
//! The generation model itself is a black-box capability behind
//! [`GenerationModel`]; this module only owns prompt composition and the
//! fixed fallback for queries that retrieved nothing.

use crate::retriever::RetrievedChunk;
use std::sync::Arc;
use thiserror::Error;

/// Answer returned when retrieval yields zero chunks; the model is not
/// called at all in that case.
pub const NO_CONTEXT_ANSWER: &str = "I cannot find this information in the provided context.";

#[derive(Error, Debug)]
pub enum GenerationError {
    /// Backend failed to initialize or respond
    #[error("Generation model unavailable: {0}")]
    ModelUnavailable(String),
}

/// A text-generation capability: prompt in, answer out.
///
/// Constructed explicitly (model loading is expensive) and passed into the
/// [`Generator`] by `Arc`. Calls are blocking and synchronous; no timeout
/// or retry semantics are provided.
pub trait GenerationModel: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}

/// Composes grounded prompts and delegates to a [`GenerationModel`].
pub struct Generator {
    model: Arc<dyn GenerationModel>,
}

impl Generator {
    pub fn new(model: Arc<dyn GenerationModel>) -> Self {
        Self { model }
    }

    /// Build the prompt sent to the model: instructions, retrieved context
    /// (scores stripped) and the question.
    pub fn build_prompt(context: &str, question: &str) -> String {
        format!(
            "Task: answer the question using only the provided context.\n\
             Rules:\n\
             - Include all key details found in the context.\n\
             - If the answer is not in the context, say \"cannot find\".\n\
             - Answer in complete sentences.\n\
             \n\
             Context:\n{context}\n\
             \n\
             Question:\n{question}\n\
             \n\
             Answer:"
        )
    }

    /// Join retrieved chunk texts into a context string, newline-separated,
    /// scores stripped.
    pub fn build_context(chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Generate an answer for `question` grounded in `chunks`. Returns the
    /// fixed [`NO_CONTEXT_ANSWER`] when no chunks were retrieved.
    pub fn answer(
        &self,
        question: &str,
        chunks: &[RetrievedChunk],
    ) -> Result<String, GenerationError> {
        if chunks.is_empty() {
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let context = Self::build_context(chunks);
        let prompt = Self::build_prompt(&context, question);
        let answer = self.model.generate(&prompt)?;
        Ok(answer.trim().to_string())
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct EchoModel;

    impl GenerationModel for EchoModel {
        fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("echo: {} chars", prompt.len()))
        }

        fn model_name(&self) -> &str {
            "echo-test"
        }
    }

    fn chunk(text: &str, score: f32) -> RetrievedChunk {
        RetrievedChunk {
            text: text.to_string(),
            metadata: HashMap::new(),
            score,
        }
    }

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = Generator::build_prompt("Some context.", "What is it?");
        assert!(prompt.contains("Some context."));
        assert!(prompt.contains("What is it?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_context_joins_texts_without_scores() {
        let chunks = vec![chunk("first", 0.9), chunk("second", 0.5)];
        let context = Generator::build_context(&chunks);
        assert_eq!(context, "first\nsecond");
        assert!(!context.contains("0.9"));
    }

    #[test]
    fn test_fallback_on_empty_retrieval() {
        let generator = Generator::new(Arc::new(EchoModel));
        let answer = generator.answer("anything?", &[]).unwrap();
        assert_eq!(answer, NO_CONTEXT_ANSWER);
    }

    #[test]
    fn test_model_called_with_chunks() {
        let generator = Generator::new(Arc::new(EchoModel));
        let answer = generator
            .answer("question?", &[chunk("context text", 1.0)])
            .unwrap();
        assert!(answer.starts_with("echo:"));
    }
}
