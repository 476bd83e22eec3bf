//! Failure history store
//!
//! Read-only view over the persisted failure log. Whoever executes the
//! generated tests appends to that file; this module never writes it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// How much of the failure log reaches the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Whole log, verbatim (prompt grows with the log)
    #[default]
    Unbounded,
    /// Only the last `n` records; records are separated by blank lines
    MostRecent(usize),
}

/// Persisted record of prior test failures
#[derive(Debug, Clone)]
pub struct FailureHistory {
    /// Log file location
    path: PathBuf,
    /// Retention applied on read
    retention: RetentionPolicy,
}

impl FailureHistory {
    /// Create store over a log file, unbounded retention
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retention: RetentionPolicy::Unbounded,
        }
    }

    /// With retention policy
    #[inline]
    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Get log path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get retention policy
    #[inline]
    #[must_use]
    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Read the history block
    ///
    /// Returns the trimmed log content, or an empty string if the log does
    /// not exist. Under `MostRecent(n)` only the last `n` records are kept.
    ///
    /// # Errors
    /// Returns `HistoryError::Io` if the log exists but cannot be read
    pub async fn read(&self) -> Result<String, HistoryError> {
        let content = self.read_raw().await?;

        match self.retention {
            RetentionPolicy::Unbounded => Ok(content),
            RetentionPolicy::MostRecent(n) => {
                let records = split_records(&content);
                let keep = records.len().saturating_sub(n);
                Ok(records[keep..].join("\n\n"))
            }
        }
    }

    /// Read the log as individual records, oldest first
    ///
    /// Retention is not applied.
    ///
    /// # Errors
    /// Returns `HistoryError::Io` if the log exists but cannot be read
    pub async fn records(&self) -> Result<Vec<String>, HistoryError> {
        let content = self.read_raw().await?;
        Ok(split_records(&content)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    async fn read_raw(&self) -> Result<String, HistoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No failure history at {}", self.path.display());
                Ok(String::new())
            }
            Err(source) => Err(HistoryError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Split on blank lines, dropping empty records
fn split_records(content: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                records.push(content[s..end].trim_end());
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        records.push(content[s..end].trim_end());
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = FailureHistory::new(dir.path().join("absent.log"));
        assert_eq!(history.read().await.unwrap(), "");
        assert!(history.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn content_is_trimmed_and_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.log");
        std::fs::write(&path, "\n\nFAILED test_divide - ZeroDivisionError\n  detail\n\n").unwrap();

        let history = FailureHistory::new(&path);
        assert_eq!(
            history.read().await.unwrap(),
            "FAILED test_divide - ZeroDivisionError\n  detail"
        );
    }

    #[tokio::test]
    async fn most_recent_keeps_tail_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.log");
        std::fs::write(&path, "first\nline\n\nsecond\n\n\nthird\n").unwrap();

        let history = FailureHistory::new(&path).with_retention(RetentionPolicy::MostRecent(2));
        assert_eq!(history.read().await.unwrap(), "second\n\nthird");
        assert_eq!(
            history.records().await.unwrap(),
            vec!["first\nline", "second", "third"]
        );
    }

    #[tokio::test]
    async fn most_recent_larger_than_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.log");
        std::fs::write(&path, "only").unwrap();

        let history = FailureHistory::new(&path).with_retention(RetentionPolicy::MostRecent(10));
        assert_eq!(history.read().await.unwrap(), "only");
    }

    #[tokio::test]
    async fn unreadable_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a string.
        let history = FailureHistory::new(dir.path());
        assert!(matches!(history.read().await, Err(HistoryError::Io { .. })));
    }

    #[test]
    fn split_records_handles_crlf_and_whitespace_lines() {
        assert_eq!(split_records("a\r\n \r\nb"), vec!["a", "b"]);
        assert!(split_records("").is_empty());
    }
}
