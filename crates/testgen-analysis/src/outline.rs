//! Function outlines
//!
//! A single syntax-tree pass that yields name, docstring and findings for
//! every function, so identity, documentation and risk all come from the same
//! parse.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::analyzer;
use crate::error::AnalysisError;
use crate::finding::Finding;
use crate::unit::CodeUnit;

/// tree-sitter node kind for `def` / `async def`
const FUNCTION_DEFINITION: &str = "function_definition";

/// Structured view of one function definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOutline {
    /// Function name
    pub name: String,

    /// Cleaned docstring, if the body starts with a string literal
    pub docstring: Option<String>,

    /// 1-based line of the `def`
    pub line: usize,

    /// Declared with `async def`
    pub is_async: bool,

    /// Structural findings scoped to this function (always empty for `async def`)
    pub findings: Vec<Finding>,
}

/// Outline every function definition in `source`
///
/// # Errors
/// Returns the parse error if `source` is not valid Python
pub fn outline(source: &str) -> Result<Vec<FunctionOutline>, AnalysisError> {
    CodeUnit::parse(source).functions()
}

/// Walk the tree breadth-first, outlining each function definition
pub(crate) fn collect(tree: &tree_sitter::Tree, source: &str) -> Vec<FunctionOutline> {
    let mut outlines = Vec::new();
    let mut queue = VecDeque::from([tree.root_node()]);

    while let Some(node) = queue.pop_front() {
        if node.kind() == FUNCTION_DEFINITION {
            if let Some(outline) = outline_function(node, source) {
                outlines.push(outline);
            }
        }

        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                queue.push_back(child);
            }
        }
    }

    outlines
}

fn outline_function(node: tree_sitter::Node<'_>, source: &str) -> Option<FunctionOutline> {
    let name = node
        .child_by_field_name("name")?
        .utf8_text(source.as_bytes())
        .ok()?
        .to_string();

    let is_async = node.child(0).is_some_and(|first| first.kind() == "async");

    let findings = if is_async {
        Vec::new()
    } else {
        analyzer::function_findings(node, &name)
    };

    Some(FunctionOutline {
        findings,
        docstring: docstring(node, source),
        line: node.start_position().row + 1,
        is_async,
        name,
    })
}

/// Docstring of a function: its first statement, if that is a plain string
fn docstring(node: tree_sitter::Node<'_>, source: &str) -> Option<String> {
    let body = node.child_by_field_name("body")?;

    let first = (0..body.named_child_count())
        .filter_map(|i| body.named_child(i))
        .find(|child| child.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }

    let literal = first.named_child(0)?;
    if literal.kind() != "string" {
        return None;
    }

    let raw = literal.utf8_text(source.as_bytes()).ok()?;
    string_literal_value(raw).map(|value| clean_docstring(&value))
}

/// Strip prefix and quotes from a string literal; `None` for bytes and f-strings
fn string_literal_value(raw: &str) -> Option<String> {
    let quote_start = raw.find(['"', '\''])?;
    let prefix = raw[..quote_start].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let quoted = &raw[quote_start..];
    ["\"\"\"", "'''", "\"", "'"].iter().find_map(|quote| {
        let fits = quoted.len() >= 2 * quote.len();
        (fits && quoted.starts_with(quote) && quoted.ends_with(quote))
            .then(|| quoted[quote.len()..quoted.len() - quote.len()].to_string())
    })
}

/// Remove the common indentation of continuation lines, then trim
fn clean_docstring(raw: &str) -> String {
    let mut lines = raw.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    std::iter::once(first)
        .chain(rest.iter().map(|line| strip_indent(line, indent).trim_end().to_string()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let cut = line
        .char_indices()
        .take_while(|(_, c)| c.is_whitespace())
        .nth(indent)
        .map_or_else(|| line.len() - line.trim_start().len(), |(idx, _)| idx);
    &line[cut..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingKind;

    #[test]
    fn outlines_name_docstring_and_line() {
        let source = "\
import math

def divide(a, b):
    \"\"\" This function divides two numbers. \"\"\"
    if b == 0:
        raise ValueError(\"Cannot divide by zero\")
    return a / b
";
        let outlines = outline(source).unwrap();
        assert_eq!(outlines.len(), 1);

        let divide = &outlines[0];
        assert_eq!(divide.name, "divide");
        assert_eq!(divide.line, 3);
        assert!(!divide.is_async);
        assert_eq!(
            divide.docstring.as_deref(),
            Some("This function divides two numbers.")
        );
        assert_eq!(
            divide.findings.iter().map(|f| f.kind).collect::<Vec<_>>(),
            vec![FindingKind::DivisionRisk, FindingKind::MissingExceptionHandling]
        );
    }

    #[test]
    fn multiline_docstring_is_dedented() {
        let source = "\
def area(r):
    '''Compute area.

        Uses pi.
    '''
    return 3.14 * r * r
";
        let outlines = outline(source).unwrap();
        assert_eq!(
            outlines[0].docstring.as_deref(),
            Some("Compute area.\n\nUses pi.")
        );
    }

    #[test]
    fn docstring_after_comment() {
        let source = "def f():\n    # leading comment\n    \"doc\"\n    return 1\n";
        assert_eq!(outline(source).unwrap()[0].docstring.as_deref(), Some("doc"));
    }

    #[test]
    fn no_docstring_when_first_statement_is_code() {
        let source = "def f():\n    x = 1\n    \"\"\"not a docstring\"\"\"\n";
        assert_eq!(outline(source).unwrap()[0].docstring, None);
    }

    #[test]
    fn bytes_and_fstrings_are_not_docstrings() {
        assert_eq!(outline("def f():\n    b'raw'\n").unwrap()[0].docstring, None);
        assert_eq!(outline("def f():\n    f'{x}'\n").unwrap()[0].docstring, None);
    }

    #[test]
    fn raw_prefix_is_stripped() {
        let outlines = outline("def f():\n    r\"\"\"a\\b\"\"\"\n").unwrap();
        assert_eq!(outlines[0].docstring.as_deref(), Some("a\\b"));
    }

    #[test]
    fn async_functions_are_outlined_without_findings() {
        let outlines = outline("async def tick(a, b):\n    return a / b\n").unwrap();
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].name, "tick");
        assert!(outlines[0].is_async);
        assert!(outlines[0].findings.is_empty());
    }

    #[test]
    fn parse_error_propagates() {
        assert!(outline("def (:\n").is_err());
    }

    #[test]
    fn string_literal_value_variants() {
        assert_eq!(string_literal_value("\"\"\"x\"\"\"").as_deref(), Some("x"));
        assert_eq!(string_literal_value("'x'").as_deref(), Some("x"));
        assert_eq!(string_literal_value("U'x'").as_deref(), Some("x"));
        assert_eq!(string_literal_value("\"\"").as_deref(), Some(""));
        assert_eq!(string_literal_value("Rb'x'"), None);
    }
}
