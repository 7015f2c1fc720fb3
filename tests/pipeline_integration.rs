//! Full pipeline: ingest, retrieve, generate, log.

mod common;

use common::{CannedModel, HashEmbedder};
use ragpipe::chunking::RecursiveChunker;
use ragpipe::generation::{Generator, NO_CONTEXT_ANSWER};
use ragpipe::logger::QueryLogger;
use ragpipe::pipeline::RagPipeline;
use ragpipe::retriever::{Document, Retriever};
use std::sync::Arc;
use tempfile::TempDir;

fn pipeline(log_dir: &std::path::Path) -> RagPipeline {
    let retriever = Retriever::new(
        Box::new(RecursiveChunker::new(100, 0)),
        Arc::new(HashEmbedder),
    );
    let generator = Generator::new(Arc::new(CannedModel::new("Pakistan won in 1992.")));
    let logger = QueryLogger::new(log_dir, "test_").unwrap();
    RagPipeline::new(retriever, generator, logger)
}

#[test]
fn query_produces_answer_and_log_record() {
    let temp = TempDir::new().unwrap();
    let mut pipeline = pipeline(temp.path());

    pipeline
        .add_documents(vec![
            Document::PlainText("Pakistan won the World Cup in 1992.".to_string()),
            Document::PlainText("The quick brown fox jumps over the lazy dog.".to_string()),
        ])
        .unwrap();

    let outcome = pipeline
        .query("Who won the World Cup?", 1, Some("session-1".to_string()))
        .unwrap();

    assert_eq!(outcome.answer, "Pakistan won in 1992.");
    assert_eq!(outcome.group_id, "session-1");
    assert_eq!(outcome.retrieved_chunks.len(), 1);
    assert!(outcome.retrieved_chunks[0].contains("Pakistan"));
    assert!(outcome.prompt.contains("Who won the World Cup?"));
    assert_eq!(outcome.retrieval_scores.len(), 1);

    let logger = QueryLogger::new(temp.path(), "test_").unwrap();
    let records = logger.recent(10).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "Who won the World Cup?");
    assert_eq!(records[0].generated_answer, "Pakistan won in 1992.");
    assert_eq!(records[0].group_id, "session-1");
    assert_eq!(records[0].retrieval_scores.len(), 1);
}

#[test]
fn empty_store_yields_fallback_answer() {
    let temp = TempDir::new().unwrap();
    let pipeline = pipeline(temp.path());

    let outcome = pipeline.query("Anything?", 3, None).unwrap();

    assert_eq!(outcome.answer, NO_CONTEXT_ANSWER);
    assert!(outcome.retrieved_chunks.is_empty());
    assert!(!outcome.group_id.is_empty());
}

#[test]
fn batch_query_answers_each_question() {
    let temp = TempDir::new().unwrap();
    let mut pipeline = pipeline(temp.path());

    pipeline
        .add_documents(vec![Document::PlainText(
            "Pakistan won the World Cup in 1992.".to_string(),
        )])
        .unwrap();

    let questions = vec![
        "Who won the World Cup?".to_string(),
        "When was the final?".to_string(),
    ];
    let outcomes = pipeline.batch_query(&questions, 1).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].question, questions[0]);
    assert_eq!(outcomes[1].question, questions[1]);
    // Each question got its own group id.
    assert_ne!(outcomes[0].group_id, outcomes[1].group_id);

    let logger = QueryLogger::new(temp.path(), "test_").unwrap();
    assert_eq!(logger.recent(10).unwrap().len(), 2);
}
