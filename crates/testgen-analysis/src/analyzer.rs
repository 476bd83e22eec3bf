//! Structural analyzer
//!
//! Two heuristics per `def` (not `async def`), each evaluated over the
//! function's whole subtree, nested functions and lambdas included:
//!
//! - **DivisionRisk**: a true division (`/`) appears anywhere in the function,
//!   its decorators included
//! - **MissingExceptionHandling**: no `try` statement appears anywhere in the body

use crate::finding::Finding;
use crate::unit::CodeUnit;

/// tree-sitter node kind for binary arithmetic
const BINARY_OPERATOR: &str = "binary_operator";
/// tree-sitter node kind for try/except/finally blocks
const TRY_STATEMENT: &str = "try_statement";
/// tree-sitter node kind wrapping a definition and its decorators
const DECORATED_DEFINITION: &str = "decorated_definition";

/// Analyze Python source for structural risks
///
/// Returns zero, one or two findings per `def`, in breadth-first order of
/// the definitions. `async def` functions are not analyzed. If the source does not parse, the
/// result is exactly one `ParseFailure` finding.
#[must_use]
pub fn analyze(source: &str) -> Vec<Finding> {
    let findings = CodeUnit::parse(source).findings();
    tracing::debug!("Static analysis produced {} findings", findings.len());
    findings
}

/// Evaluate both heuristics for one `function_definition` node
pub(crate) fn function_findings(node: tree_sitter::Node<'_>, name: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if subtree_any(node, is_true_division) || decorators_divide(node) {
        findings.push(Finding::division_risk(name));
    }

    if !subtree_any(node, |n| n.kind() == TRY_STATEMENT) {
        findings.push(Finding::missing_exception_handling(name));
    }

    findings
}

/// Decorators sit beside the `def` in a `decorated_definition`, not under it
fn decorators_divide(node: tree_sitter::Node<'_>) -> bool {
    let Some(parent) = node.parent().filter(|p| p.kind() == DECORATED_DEFINITION) else {
        return false;
    };

    (0..parent.child_count())
        .filter_map(|i| parent.child(i))
        .filter(|child| child.kind() == "decorator")
        .any(|decorator| subtree_any(decorator, is_true_division))
}

/// `a / b`, but not `a // b` and not `a /= b`
fn is_true_division(node: tree_sitter::Node<'_>) -> bool {
    node.kind() == BINARY_OPERATOR
        && node
            .child_by_field_name("operator")
            .is_some_and(|op| op.kind() == "/")
}

/// Check whether any node in the subtree rooted at `root` matches
fn subtree_any<F>(root: tree_sitter::Node<'_>, predicate: F) -> bool
where
    F: Fn(tree_sitter::Node<'_>) -> bool,
{
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if predicate(node) {
            return true;
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    false
}
