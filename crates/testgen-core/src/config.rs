//! Generator configuration
//!
//! Plain values handed to the pipeline by its driver. Every field has a
//! default, so an empty TOML document is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::RetentionPolicy;

/// Default model identifier sent to the oracle
pub const DEFAULT_MODEL: &str = "qwen2.5-coder";
/// Default Ollama endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
/// Default failure log location
pub const DEFAULT_FAILURE_LOG: &str = "results/test_failures.log";
/// Default generated test location
pub const DEFAULT_OUTPUT_PATH: &str = "tests/ai_generated_tests.py";
/// Default requested test category
pub const DEFAULT_TEST_CATEGORY: &str = "unit";

/// Where function name and docstring come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// First textual match of the name/docstring patterns
    #[default]
    Pattern,
    /// First function in the syntax tree, falling back to patterns when the
    /// source does not parse or defines no function
    Syntax,
}

/// Test generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model identifier
    pub model: String,
    /// Oracle base URL
    pub endpoint: String,
    /// Persisted failure log read into every prompt
    pub failure_log: PathBuf,
    /// Default destination of generated tests
    pub output_path: PathBuf,
    /// Requested test category ("unit", "integration", ...)
    pub test_category: String,
    /// How much failure history reaches the prompt
    pub history_retention: RetentionPolicy,
    /// Metadata derivation strategy
    pub metadata_source: MetadataSource,
}

impl GeneratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` for values that fail validation
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`GeneratorConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "model",
                message: "must not be empty".to_string(),
            });
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "endpoint",
                message: "must not be empty".to_string(),
            });
        }
        if self.test_category.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "test_category",
                message: "must not be empty".to_string(),
            });
        }
        if let RetentionPolicy::MostRecent(0) = self.history_retention {
            return Err(ConfigError::Invalid {
                field: "history_retention",
                message: "most_recent must keep at least one record".to_string(),
            });
        }
        Ok(())
    }

    /// With model identifier
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With oracle endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With failure log path
    #[inline]
    #[must_use]
    pub fn with_failure_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.failure_log = path.into();
        self
    }

    /// With output path
    #[inline]
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// With test category
    #[inline]
    #[must_use]
    pub fn with_test_category(mut self, category: impl Into<String>) -> Self {
        self.test_category = category.into();
        self
    }

    /// With history retention
    #[inline]
    #[must_use]
    pub fn with_history_retention(mut self, retention: RetentionPolicy) -> Self {
        self.history_retention = retention;
        self
    }

    /// With metadata source
    #[inline]
    #[must_use]
    pub fn with_metadata_source(mut self, source: MetadataSource) -> Self {
        self.metadata_source = source;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            failure_log: PathBuf::from(DEFAULT_FAILURE_LOG),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            test_category: DEFAULT_TEST_CATEGORY.to_string(),
            history_retention: RetentionPolicy::default(),
            metadata_source: MetadataSource::default(),
        }
    }
}
