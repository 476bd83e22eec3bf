//! Testgen Core - prompt-driven test generation
//!
//! Takes the raw text of a Python function and turns it into a persisted
//! pytest file:
//! - Reads the accumulated failure history
//! - Composes a deterministic prompt from metadata, findings and history
//! - Sends it to a text-completion oracle
//! - Strips code fences from the reply and writes it out
//!
//! # Example
//!
//! ```rust,ignore
//! use testgen_core::{GeneratorConfig, TestGenerator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::new().with_test_category("unit");
//! let generator = TestGenerator::ollama(config);
//!
//! let report = generator
//!     .run("def divide(a, b):\n    return a / b\n")
//!     .await?;
//!
//! println!("Wrote {} bytes to {}", report.generated_bytes, report.artifact_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod oracle;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;
pub mod writer;

// Re-exports for convenience
pub use client::GenerationClient;
pub use config::{GeneratorConfig, MetadataSource};
pub use error::{ConfigError, GenerationError, HistoryError, PersistenceError, PipelineError};
pub use history::{FailureHistory, RetentionPolicy};
pub use oracle::{OllamaOracle, Oracle};
pub use pipeline::{PipelineReport, TestGenerator};
pub use prompt::{compose, PromptContext};
pub use sanitize::{sanitize, FenceSanitizer};
pub use writer::ArtifactWriter;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Testgen Core
    pub use crate::{
        compose, sanitize, ArtifactWriter, FailureHistory, GenerationClient, GeneratorConfig,
        Oracle, PipelineReport, PromptContext, TestGenerator,
    };
    pub use testgen_analysis::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
