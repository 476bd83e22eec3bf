//! Testgen Analysis
//!
//! Everything the generator learns about a Python function before it talks to
//! a model:
//!
//! - **Structural analysis**: tree-sitter walk producing risk [`Finding`]s
//! - **Outlines**: one structured record per function (name, docstring, findings)
//! - **Metadata extraction**: pattern-based name/docstring lookup on raw text
//!
//! # Architecture
//!
//! ```text
//! source ──► CodeUnit (tree-sitter) ──► outline() ──► analyze() ──► Vec<Finding>
//!   │
//!   └──────► extract() (regex) ──► FunctionMetadata
//! ```
//!
//! The two paths are independent on purpose: `extract` only looks at text and
//! can disagree with the syntax tree when a source holds several functions.
//!
//! # Example
//!
//! ```rust
//! use testgen_analysis::{analyze, extract, FindingKind};
//!
//! let source = "def divide(a, b):\n    return a / b\n";
//!
//! let findings = analyze(source);
//! assert_eq!(findings[0].kind, FindingKind::DivisionRisk);
//!
//! let metadata = extract(source);
//! assert_eq!(metadata.name, "divide");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod analyzer;
pub mod error;
pub mod finding;
pub mod metadata;
pub mod outline;
pub mod unit;

// Re-exports for convenience
pub use analyzer::analyze;
pub use error::{AnalysisError, ExtractError};
pub use finding::{Finding, FindingKind};
pub use metadata::{extract, FunctionMetadata, UNKNOWN_FUNCTION};
pub use outline::{outline, FunctionOutline};
pub use unit::CodeUnit;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with function analysis
    pub use crate::{
        analyze, extract, outline, AnalysisError, CodeUnit, Finding, FindingKind,
        FunctionMetadata, FunctionOutline,
    };
}
