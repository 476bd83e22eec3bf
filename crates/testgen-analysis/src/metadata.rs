//! Metadata extractor
//!
//! Pattern-based lookup of a function's name and docstring on raw text. Only
//! the first textual match of each pattern is used; with several functions in
//! one source the name and docstring may come from different definitions.
//! Use [`FunctionMetadata::from_outline`] for a syntax-tree-consistent view.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::outline::FunctionOutline;

/// Name used when no function declaration is found
pub const UNKNOWN_FUNCTION: &str = "Unknown Function";

const NAME_PATTERN: &str = r"def (\w+)\(";
const DOCSTRING_PATTERN: &str = r#"(?s)"""(.*?)""""#;

/// Display name and documentation of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Function name (`"Unknown Function"` when absent)
    pub name: String,
    /// Trimmed docstring (empty when absent)
    pub docstring: String,
}

impl FunctionMetadata {
    /// Create metadata from parts
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docstring: docstring.into(),
        }
    }

    /// Metadata from a syntax-tree outline
    #[must_use]
    pub fn from_outline(outline: &FunctionOutline) -> Self {
        Self {
            name: outline.name.clone(),
            docstring: outline.docstring.clone().unwrap_or_default(),
        }
    }

    /// Check if a docstring was found
    #[inline]
    #[must_use]
    pub fn has_docstring(&self) -> bool {
        !self.docstring.is_empty()
    }
}

impl Default for FunctionMetadata {
    fn default() -> Self {
        Self {
            name: UNKNOWN_FUNCTION.to_string(),
            docstring: String::new(),
        }
    }
}

/// Compiled metadata patterns
struct Patterns {
    name: Regex,
    docstring: Regex,
}

static PATTERNS: OnceCell<Patterns> = OnceCell::new();

fn patterns() -> Result<&'static Patterns, ExtractError> {
    PATTERNS.get_or_try_init(|| {
        Ok(Patterns {
            name: compile(NAME_PATTERN)?,
            docstring: compile(DOCSTRING_PATTERN)?,
        })
    })
}

fn compile(pattern: &'static str) -> Result<Regex, ExtractError> {
    Regex::new(pattern).map_err(|source| ExtractError::Pattern { pattern, source })
}

/// Extract function name and docstring from raw source text
///
/// Never fails: missing matches and internal errors both fall back to
/// [`FunctionMetadata::default`] values, the latter after being logged.
#[must_use]
pub fn extract(source: &str) -> FunctionMetadata {
    let mut metadata = FunctionMetadata::default();

    match patterns() {
        Ok(patterns) => {
            if let Some(name) = patterns.name.captures(source).and_then(|c| c.get(1)) {
                metadata.name = name.as_str().to_string();
            }
            if let Some(doc) = patterns.docstring.captures(source).and_then(|c| c.get(1)) {
                metadata.docstring = doc.as_str().trim().to_string();
            }
        }
        Err(e) => {
            tracing::error!("Error extracting function details: {}", e);
        }
    }

    metadata
}
