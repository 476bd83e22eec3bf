//! Error types for Testgen Core
//!
//! Provides error handling for:
//! - Configuration loading
//! - Failure history reads
//! - Model generation
//! - Artifact persistence
//!
//! Only [`PersistenceError`] reaches callers of the default pipeline; the
//! others are logged and absorbed into defaults there. The explicit
//! `try_*` entry points surface [`GenerationError`] through [`PipelineError`].

use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`GeneratorConfig`](crate::GeneratorConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation
    #[error("invalid config value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Failure history read errors
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// History file exists but could not be read
    #[error("io error reading failure history {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the generation oracle
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport-level failure
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Oracle answered with a non-success status
    #[error("oracle error {status}: {body}")]
    Status { status: u16, body: String },

    /// Oracle reply did not have the expected shape
    #[error("invalid oracle response: {0}")]
    InvalidResponse(String),

    /// Oracle-specific failure
    #[error("oracle failed: {0}")]
    Oracle(String),
}

impl GenerationError {
    /// Check if the failure happened before the oracle produced a reply
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Artifact write errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Writing the artifact failed
    #[error("io error writing test artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Destination that failed
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors from the explicit pipeline entry points
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Model generation failed; nothing was written
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Failure history could not be read
    #[error("history unavailable: {0}")]
    History(#[from] HistoryError),

    /// Artifact could not be written
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}
