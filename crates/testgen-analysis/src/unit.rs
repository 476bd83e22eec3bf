//! Code unit: raw Python source plus its syntax tree
//!
//! tree-sitter never refuses input; it recovers and marks the damage with
//! `ERROR`/`MISSING` nodes. A [`CodeUnit`] turns that into a hard parse
//! outcome so that analysis can treat "unparsable" as a single, explicit case.

use crate::error::AnalysisError;
use crate::finding::Finding;
use crate::outline::{self, FunctionOutline};

/// Longest snippet of offending text quoted in a syntax error
const MAX_SNIPPET_CHARS: usize = 40;

/// Python 2 statement forms the grammar still accepts
const PYTHON2_STATEMENTS: [(&str, &str); 2] =
    [("print_statement", "print"), ("exec_statement", "exec")];

/// Raw source text of a Python function together with its parse outcome
///
/// Immutable once built; all accessors borrow.
#[derive(Clone)]
pub struct CodeUnit {
    /// Source text exactly as supplied
    source: String,
    /// Syntax tree, or why there is none
    syntax: Result<tree_sitter::Tree, AnalysisError>,
}

impl CodeUnit {
    /// Parse source into a code unit
    ///
    /// Never fails: a parse error is stored and reported through
    /// [`CodeUnit::parse_error`] and [`CodeUnit::findings`].
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let syntax = parse_python(&source);

        if let Err(e) = &syntax {
            tracing::debug!("Python source did not parse: {}", e);
        }

        Self { source, syntax }
    }

    /// Get source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get syntax tree (if parsing succeeded)
    #[inline]
    #[must_use]
    pub fn tree(&self) -> Option<&tree_sitter::Tree> {
        self.syntax.as_ref().ok()
    }

    /// Get parse error (if parsing failed)
    #[inline]
    #[must_use]
    pub fn parse_error(&self) -> Option<&AnalysisError> {
        self.syntax.as_ref().err()
    }

    /// Check if the source parsed cleanly
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.syntax.is_ok()
    }

    /// Outline every function definition, breadth-first
    ///
    /// # Errors
    /// Returns the stored parse error if the source did not parse
    pub fn functions(&self) -> Result<Vec<FunctionOutline>, AnalysisError> {
        match &self.syntax {
            Ok(tree) => Ok(outline::collect(tree, &self.source)),
            Err(e) => Err(e.clone()),
        }
    }

    /// Structural findings for every function in the unit
    ///
    /// A parse failure yields exactly one `ParseFailure` finding and nothing else.
    #[must_use]
    pub fn findings(&self) -> Vec<Finding> {
        match self.functions() {
            Ok(functions) => functions
                .into_iter()
                .flat_map(|function| function.findings)
                .collect(),
            Err(e) => vec![Finding::parse_failure(&e)],
        }
    }
}

impl std::fmt::Debug for CodeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeUnit")
            .field("source_len", &self.source.len())
            .field("parse_error", &self.parse_error())
            .finish()
    }
}

/// Parse Python source, rejecting anything the Python parser would reject
fn parse_python(source: &str) -> Result<tree_sitter::Tree, AnalysisError> {
    if source.contains('\0') {
        return Err(AnalysisError::NullByte);
    }
    check_module_indent(source)?;

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| AnalysisError::ParserInit(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or(AnalysisError::ParseFailed)?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source)
            .unwrap_or_else(|| AnalysisError::syntax(root.start_position(), "invalid syntax")));
    }
    if let Some(error) = first_python2_statement(root) {
        return Err(error);
    }

    Ok(tree)
}

/// Module-level code must start at column zero
///
/// tree-sitter's indentation scanner tolerates a uniformly indented module;
/// Python does not.
fn check_module_indent(source: &str) -> Result<(), AnalysisError> {
    for (idx, line) in source.lines().enumerate() {
        let code = line.trim_start_matches([' ', '\t', '\x0c']);
        if code.is_empty() || code.starts_with('#') {
            continue;
        }
        // A form feed resets the indentation count.
        let indent = &line[..line.len() - code.len()];
        if indent.rsplit('\x0c').next().is_some_and(|rest| !rest.is_empty()) {
            return Err(AnalysisError::UnexpectedIndent { line: idx + 1 });
        }
        return Ok(());
    }
    Ok(())
}

/// First `print x` / `exec x` statement in document order
fn first_python2_statement(root: tree_sitter::Node<'_>) -> Option<AnalysisError> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Some((_, keyword)) = PYTHON2_STATEMENTS
            .iter()
            .find(|(kind, _)| node.kind() == *kind)
        {
            return Some(AnalysisError::syntax(
                node.start_position(),
                format!("missing parentheses in call to `{}`", keyword),
            ));
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    None
}

/// Find the first error or missing node in document order
fn first_error(node: tree_sitter::Node<'_>, source: &str) -> Option<AnalysisError> {
    if node.is_missing() {
        return Some(AnalysisError::syntax(
            node.start_position(),
            format!("expected `{}`", node.kind()),
        ));
    }

    if node.is_error() {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        let snippet: String = text
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(MAX_SNIPPET_CHARS)
            .collect();
        return Some(AnalysisError::syntax(
            node.start_position(),
            format!("unexpected `{}`", snippet),
        ));
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() {
                if let Some(error) = first_error(child, source) {
                    return Some(error);
                }
            }
        }
    }

    None
}
