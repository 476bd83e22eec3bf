//! Test generation pipeline
//!
//! Runs the stages strictly one after another:
//!
//! ```text
//! source ─┬─► metadata ─┐
//!         ├─► analysis ─┼─► compose ─► oracle ─► sanitize ─► write
//! history ┘─────────────┘
//! ```
//!
//! Intended for a single caller at a time: the failure log and the output
//! file are each touched once per run, without locking.

use std::path::{Path, PathBuf};

use testgen_analysis::{extract, CodeUnit, Finding, FunctionMetadata};

use crate::client::GenerationClient;
use crate::config::{GeneratorConfig, MetadataSource};
use crate::error::{PersistenceError, PipelineError};
use crate::history::FailureHistory;
use crate::oracle::{OllamaOracle, Oracle};
use crate::prompt::{self, PromptContext};
use crate::sanitize::sanitize;
use crate::writer::ArtifactWriter;

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Function name used in the prompt
    pub function_name: String,
    /// Structural findings fed into the prompt
    pub findings: Vec<Finding>,
    /// Prompt sent to the oracle
    pub prompt: PromptContext,
    /// Where the generated test was written
    pub artifact_path: PathBuf,
    /// Size of the sanitized test code
    pub generated_bytes: usize,
}

impl PipelineReport {
    /// Check if the written artifact is empty
    ///
    /// With [`TestGenerator::run`] this is also what a failed generation looks like.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generated_bytes == 0
    }
}

/// Everything derived from the source before the oracle is called
#[derive(Debug)]
struct Prepared {
    metadata: FunctionMetadata,
    findings: Vec<Finding>,
    prompt: PromptContext,
}

/// Drives one function through analysis, generation and persistence
#[derive(Debug)]
pub struct TestGenerator<O> {
    config: GeneratorConfig,
    history: FailureHistory,
    client: GenerationClient<O>,
    writer: ArtifactWriter,
}

impl TestGenerator<OllamaOracle> {
    /// Create generator talking to the configured Ollama endpoint
    #[must_use]
    pub fn ollama(config: GeneratorConfig) -> Self {
        let oracle = OllamaOracle::new(config.endpoint.clone(), config.model.clone());
        Self::new(config, oracle)
    }
}

impl<O: Oracle> TestGenerator<O> {
    /// Create generator over any oracle
    #[must_use]
    pub fn new(config: GeneratorConfig, oracle: O) -> Self {
        Self {
            history: FailureHistory::new(&config.failure_log)
                .with_retention(config.history_retention),
            writer: ArtifactWriter::new(&config.output_path),
            client: GenerationClient::new(oracle),
            config,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Get generation client
    #[inline]
    #[must_use]
    pub fn client(&self) -> &GenerationClient<O> {
        &self.client
    }

    /// Compose the prompt for `source` without calling the oracle
    pub async fn prepare_prompt(&self, source: &str) -> PromptContext {
        self.prepare(source).await.prompt
    }

    /// Generate sanitized test code for `source`
    ///
    /// Returns an empty string if generation failed.
    pub async fn generate_test_case(&self, source: &str) -> String {
        let prepared = self.prepare(source).await;
        self.generate(&prepared).await
    }

    /// Run the full pipeline, writing to the configured output path
    ///
    /// Generation failures are logged and produce an empty artifact.
    ///
    /// # Errors
    /// Returns `PersistenceError` if the artifact cannot be written
    pub async fn run(&self, source: &str) -> Result<PipelineReport, PersistenceError> {
        self.run_to(source, self.writer.default_path()).await
    }

    /// Run the full pipeline, writing to `path`
    ///
    /// # Errors
    /// Returns `PersistenceError` if the artifact cannot be written
    pub async fn run_to(
        &self,
        source: &str,
        path: impl AsRef<Path>,
    ) -> Result<PipelineReport, PersistenceError> {
        let prepared = self.prepare(source).await;
        let code = self.generate(&prepared).await;
        let artifact_path = self.writer.persist(&code, path).await?;
        Ok(report(prepared, artifact_path, &code))
    }

    /// Run the full pipeline, failing instead of writing an empty artifact
    ///
    /// Nothing is written when history or generation fails.
    ///
    /// # Errors
    /// Returns `PipelineError::History` if the failure log is unreadable,
    /// `PipelineError::Generation` if the oracle fails and
    /// `PipelineError::Persistence` if the write fails
    pub async fn try_run(&self, source: &str) -> Result<PipelineReport, PipelineError> {
        let history = self.history.read().await?;
        let prepared = self.prepare_with_history(source, &history);

        let reply = self.client.try_generate(prepared.prompt.as_str()).await?;
        let code = sanitize(&reply);

        let artifact_path = self.writer.persist_default(&code).await?;
        Ok(report(prepared, artifact_path, &code))
    }

    async fn prepare(&self, source: &str) -> Prepared {
        let history = match self.history.read().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Ignoring unreadable failure history: {}", e);
                String::new()
            }
        };
        self.prepare_with_history(source, &history)
    }

    fn prepare_with_history(&self, source: &str, history: &str) -> Prepared {
        let unit = CodeUnit::parse(source);
        let metadata = self.metadata_for(&unit);
        let findings = unit.findings();

        let prompt = prompt::compose(
            &metadata,
            source,
            &findings,
            history,
            &self.config.test_category,
        );

        Prepared {
            metadata,
            findings,
            prompt,
        }
    }

    fn metadata_for(&self, unit: &CodeUnit) -> FunctionMetadata {
        match self.config.metadata_source {
            MetadataSource::Pattern => extract(unit.source()),
            MetadataSource::Syntax => unit
                .functions()
                .ok()
                .and_then(|functions| functions.first().map(FunctionMetadata::from_outline))
                .unwrap_or_else(|| extract(unit.source())),
        }
    }

    async fn generate(&self, prepared: &Prepared) -> String {
        let reply = self.client.generate(prepared.prompt.as_str()).await;
        let code = sanitize(&reply);
        tracing::info!(
            "Generated Test Case for {}:\n{}",
            prepared.metadata.name,
            code
        );
        code
    }
}

fn report(prepared: Prepared, artifact_path: PathBuf, code: &str) -> PipelineReport {
    PipelineReport {
        function_name: prepared.metadata.name,
        findings: prepared.findings,
        prompt: prepared.prompt,
        artifact_path,
        generated_bytes: code.len(),
    }
}
