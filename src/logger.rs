//! Append-only query logger
//!
//! Persists one JSON record per query as newline-delimited JSON, one file
//! per day (optionally prefixed, e.g. for isolating test runs), under a
//! configured log directory. Files are only ever appended to.

use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One logged query with everything needed to audit the answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub question: String,
    pub retrieved_chunks: Vec<String>,
    pub prompt: String,
    pub generated_answer: String,
    pub timestamp: String,
    pub group_id: String,
    pub retrieval_scores: Vec<f32>,
}

impl QueryRecord {
    /// Build a record stamped with the current time. A fresh UUID is
    /// generated when no group id is supplied.
    pub fn new(
        question: impl Into<String>,
        retrieved_chunks: Vec<String>,
        prompt: impl Into<String>,
        generated_answer: impl Into<String>,
        retrieval_scores: Vec<f32>,
        group_id: Option<String>,
    ) -> Self {
        Self {
            question: question.into(),
            retrieved_chunks,
            prompt: prompt.into(),
            generated_answer: generated_answer.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            group_id: group_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            retrieval_scores,
        }
    }
}

/// Writes query records to `{prefix}rag_logs_YYYYMMDD.jsonl` in `log_dir`.
pub struct QueryLogger {
    log_dir: PathBuf,
    prefix: String,
}

impl QueryLogger {
    /// Create a logger, creating `log_dir` if needed.
    pub fn new(log_dir: &Path, prefix: &str) -> Result<Self> {
        std::fs::create_dir_all(log_dir).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to create log directory {}", log_dir.display()),
        })?;
        Ok(Self {
            log_dir: log_dir.to_path_buf(),
            prefix: prefix.to_string(),
        })
    }

    /// Path of the current day's log file.
    pub fn current_file(&self) -> PathBuf {
        let day = chrono::Local::now().format("%Y%m%d");
        self.log_dir.join(format!("{}rag_logs_{day}.jsonl", self.prefix))
    }

    /// Append one record to the current day's file.
    pub fn log_query(&self, record: &QueryRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| RagError::Json {
            source: e,
            context: "Failed to serialize query record".to_string(),
        })?;

        let path = self.current_file();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| RagError::Io {
                source: e,
                context: format!("Failed to open log file {}", path.display()),
            })?;

        writeln!(file, "{line}").map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to append to log file {}", path.display()),
        })?;

        Ok(())
    }

    /// The `n` most recent records of the current day's file. Missing file
    /// means no records yet.
    pub fn recent(&self, n: usize) -> Result<Vec<QueryRecord>> {
        let path = self.current_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to read log file {}", path.display()),
        })?;

        let mut records = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| RagError::Json {
                source: e,
                context: format!("Malformed log line in {}", path.display()),
            })?;
            records.push(record);
        }

        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(question: &str) -> QueryRecord {
        QueryRecord::new(
            question,
            vec!["chunk one".to_string()],
            "prompt",
            "answer",
            vec![0.8],
            Some("test-group".to_string()),
        )
    }

    #[test]
    fn test_log_and_read_back() {
        let temp = TempDir::new().unwrap();
        let logger = QueryLogger::new(temp.path(), "").unwrap();

        logger.log_query(&record("first?")).unwrap();
        logger.log_query(&record("second?")).unwrap();

        let records = logger.recent(10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "first?");
        assert_eq!(records[1].question, "second?");
    }

    #[test]
    fn test_recent_limits_to_last_n() {
        let temp = TempDir::new().unwrap();
        let logger = QueryLogger::new(temp.path(), "").unwrap();

        for i in 0..5 {
            logger.log_query(&record(&format!("q{i}"))).unwrap();
        }

        let records = logger.recent(2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "q3");
        assert_eq!(records[1].question, "q4");
    }

    #[test]
    fn test_prefix_in_file_name() {
        let temp = TempDir::new().unwrap();
        let logger = QueryLogger::new(temp.path(), "test_").unwrap();

        logger.log_query(&record("hello?")).unwrap();

        let file_name = logger.current_file();
        let file_name = file_name.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("test_rag_logs_"));
        assert!(file_name.ends_with(".jsonl"));
        assert!(logger.current_file().exists());
    }

    #[test]
    fn test_recent_on_missing_file() {
        let temp = TempDir::new().unwrap();
        let logger = QueryLogger::new(temp.path(), "").unwrap();
        assert!(logger.recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_default_group_id_is_fresh_uuid() {
        let a = QueryRecord::new("q", vec![], "p", "a", vec![], None);
        let b = QueryRecord::new("q", vec![], "p", "a", vec![], None);
        assert!(!a.group_id.is_empty());
        assert_ne!(a.group_id, b.group_id);
    }
}
