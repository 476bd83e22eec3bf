//! Error types for function analysis
//!
//! Neither error escapes the public analysis entry points: parse errors are
//! folded into a `ParseFailure` finding and extraction errors into default
//! metadata. They are still typed so callers working with [`CodeUnit`]
//! directly can inspect them.
//!
//! [`CodeUnit`]: crate::CodeUnit

/// Errors raised while building a syntax tree from Python source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The Python grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// tree-sitter gave up without producing a tree
    #[error("parse failed")]
    ParseFailed,

    /// Source contains a NUL byte
    #[error("source code string cannot contain null bytes")]
    NullByte,

    /// First statement is indented at module level
    #[error("unexpected indent (line {line})")]
    UnexpectedIndent {
        /// 1-based line of the offending statement
        line: usize,
    },

    /// Tree contains an error or missing node
    #[error("invalid syntax at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Description of the offending node
        message: String,
    },
}

impl AnalysisError {
    /// Create syntax error at a tree-sitter position
    #[inline]
    pub fn syntax(point: tree_sitter::Point, message: impl Into<String>) -> Self {
        Self::Syntax {
            line: point.row + 1,
            column: point.column + 1,
            message: message.into(),
        }
    }
}

/// Errors raised while pattern-matching function metadata
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractError {
    /// A metadata pattern failed to compile
    #[error("invalid metadata pattern `{pattern}`: {source}")]
    Pattern {
        /// The pattern text
        pattern: &'static str,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_is_one_based() {
        let err = AnalysisError::syntax(tree_sitter::Point { row: 0, column: 4 }, "unexpected token");
        assert_eq!(
            err.to_string(),
            "invalid syntax at line 1, column 5: unexpected token"
        );
    }

    #[test]
    fn unexpected_indent_message() {
        let err = AnalysisError::UnexpectedIndent { line: 2 };
        assert_eq!(err.to_string(), "unexpected indent (line 2)");
    }
}
