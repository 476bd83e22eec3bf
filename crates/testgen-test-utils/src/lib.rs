//! Testing utilities for Testgen workspace
//!
//! Shared oracles, Python fixtures and temp-directory helpers.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use testgen_core::{GenerationError, GeneratorConfig, Oracle};

pub const DIVIDE_SOURCE: &str = "def divide(a,b):\n    return a/b";

pub const SAFE_DIVIDE_SOURCE: &str = "\
def safe_divide(a, b):
    \"\"\"Divide a by b, returning None on zero.\"\"\"
    try:
        return a / b
    except ZeroDivisionError:
        return None
";

pub const GREET_SOURCE: &str = "\
def greet(name):
    \"\"\"Say hello.\"\"\"
    try:
        return f\"Hello, {name}\"
    except TypeError:
        return \"Hello\"
";

pub const BROKEN_SOURCE: &str = "def broken(a, b:\n    return a / b\n";

pub const FENCED_TEST: &str = "```python\nimport pytest\n\ndef test_divide():\n    assert divide(4, 2) == 2\n```";

pub const UNFENCED_TEST: &str = "import pytest\n\ndef test_divide():\n    assert divide(4, 2) == 2";

/// Oracle that replies with fixed text and records every prompt
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedOracle {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Oracle that always fails
#[derive(Debug, Clone)]
pub struct FailingOracle {
    message: String,
}

impl FailingOracle {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Oracle for FailingOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Oracle(self.message.clone()))
    }
}

/// Temporary directory holding a failure log and an output file
pub struct TempWorkspace {
    dir: tempfile::TempDir,
}

impl TempWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn failure_log(&self) -> PathBuf {
        self.dir.path().join("test_failures.log")
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("ai_generated_tests.py")
    }

    pub fn write_failures(&self, content: &str) {
        std::fs::write(self.failure_log(), content).unwrap();
    }

    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output_path()).unwrap()
    }

    /// Default configuration rooted in this workspace
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_failure_log(self.failure_log())
            .with_output_path(self.output_path())
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
