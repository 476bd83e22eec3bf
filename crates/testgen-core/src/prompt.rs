//! Prompt composer
//!
//! Renders the fixed instruction template sent to the oracle. Composition is
//! a pure function of its inputs: no clock, no randomness, no I/O.

use std::fmt::Write as _;

use testgen_analysis::{Finding, FunctionMetadata};

/// Docstring line when the function has none
pub const NO_DOCUMENTATION_MARKER: &str = "No documentation provided";
/// Analysis line when there are no findings
pub const NO_ISSUES_MARKER: &str = "No major issues detected.";
/// Header of the trailing failure-history section
pub const HISTORY_SECTION_HEADER: &str =
    "Also, improve the test cases based on these past test failures:";

/// Coverage goals every generated test must address
pub const COVERAGE_GOALS: [&str; 3] = [
    "Edge cases (like invalid inputs)",
    "Exception handling",
    "Performance tests if applicable",
];

/// Fully composed prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptContext(String);

impl PromptContext {
    /// Get prompt text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into prompt text
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if a failure-history section was appended
    #[inline]
    #[must_use]
    pub fn has_history_section(&self) -> bool {
        self.0.contains(HISTORY_SECTION_HEADER)
    }
}

impl AsRef<str> for PromptContext {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PromptContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compose the generation prompt
///
/// Section order: preamble naming `category`, function name, docstring (or
/// [`NO_DOCUMENTATION_MARKER`]), fenced source, comma-joined finding messages
/// (or [`NO_ISSUES_MARKER`]), coverage goals, and finally the failure history
/// under [`HISTORY_SECTION_HEADER`] when `history` is non-empty.
#[must_use]
pub fn compose(
    metadata: &FunctionMetadata,
    raw_source: &str,
    findings: &[Finding],
    history: &str,
    category: &str,
) -> PromptContext {
    let docstring = if metadata.docstring.is_empty() {
        NO_DOCUMENTATION_MARKER
    } else {
        metadata.docstring.as_str()
    };

    let issues = if findings.is_empty() {
        NO_ISSUES_MARKER.to_string()
    } else {
        findings
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        prompt,
        "You are an expert software tester. Given the following Python function, \
         generate a {} test case using pytest.",
        category
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Function Name: {}", metadata.name);
    let _ = writeln!(prompt, "Function Docstring: {}", docstring);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Function Code:");
    let _ = writeln!(prompt, "```python");
    let _ = writeln!(prompt, "{}", raw_source);
    let _ = writeln!(prompt, "```");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Based on static analysis, consider these potential issues:");
    let _ = writeln!(prompt, "{}", issues);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Ensure the test case covers:");
    for goal in COVERAGE_GOALS {
        let _ = writeln!(prompt, "- {}", goal);
    }

    if !history.is_empty() {
        let _ = write!(prompt, "\n{}\n{}", HISTORY_SECTION_HEADER, history);
    }

    PromptContext(prompt)
}
