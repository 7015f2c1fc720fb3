//! End-to-end RAG pipeline
//!
//! Wires the retriever, the generator and the query logger together:
//! retrieve top-k chunks, compose a grounded prompt, generate an answer,
//! log the whole exchange.

use crate::error::Result;
use crate::generation::Generator;
use crate::logger::{QueryLogger, QueryRecord};
use crate::retriever::{Document, FileOutcome, Retriever};
use serde::Serialize;
use std::path::Path;

/// Everything produced for one question.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub question: String,
    pub answer: String,
    pub retrieved_chunks: Vec<String>,
    pub prompt: String,
    pub retrieval_scores: Vec<f32>,
    pub group_id: String,
}

/// Retriever + generator + logger, driven synchronously.
pub struct RagPipeline {
    retriever: Retriever,
    generator: Generator,
    logger: QueryLogger,
}

impl RagPipeline {
    pub fn new(retriever: Retriever, generator: Generator, logger: QueryLogger) -> Self {
        Self {
            retriever,
            generator,
            logger,
        }
    }

    /// Ingest a batch of documents into the retriever.
    pub fn add_documents(&mut self, documents: Vec<Document>) -> Result<usize> {
        self.retriever.add_documents(documents)
    }

    /// Ingest every matching file in a directory (partial-success).
    pub fn add_directory(&mut self, dir: &Path, pattern: &str) -> Result<Vec<FileOutcome>> {
        self.retriever.add_directory(dir, pattern)
    }

    /// Answer one question: retrieve `k` chunks, generate, log.
    pub fn query(&self, question: &str, k: usize, group_id: Option<String>) -> Result<QueryOutcome> {
        let chunks = self.retriever.query(question, k)?;

        let context = Generator::build_context(&chunks);
        let prompt = Generator::build_prompt(&context, question);
        let answer = self.generator.answer(question, &chunks)?;

        let retrieved_chunks: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let retrieval_scores: Vec<f32> = chunks.iter().map(|c| c.score).collect();

        let record = QueryRecord::new(
            question,
            retrieved_chunks.clone(),
            prompt.clone(),
            answer.clone(),
            retrieval_scores.clone(),
            group_id,
        );
        self.logger.log_query(&record)?;

        Ok(QueryOutcome {
            question: question.to_string(),
            answer,
            retrieved_chunks,
            prompt,
            retrieval_scores,
            group_id: record.group_id,
        })
    }

    /// Answer several questions sequentially, one model call per question.
    pub fn batch_query(&self, questions: &[String], k: usize) -> Result<Vec<QueryOutcome>> {
        let mut outcomes = Vec::with_capacity(questions.len());
        for question in questions {
            outcomes.push(self.query(question, k, None)?);
        }
        Ok(outcomes)
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}
