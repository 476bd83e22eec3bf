//! Structural risk findings

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Kind of structural risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Function body contains a true division
    DivisionRisk,
    /// Function body has no try statement
    MissingExceptionHandling,
    /// Source could not be parsed; replaces every other finding
    ParseFailure,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FindingKind::DivisionRisk => "division-risk",
            FindingKind::MissingExceptionHandling => "missing-exception-handling",
            FindingKind::ParseFailure => "parse-failure",
        };
        write!(f, "{}", name)
    }
}

/// One structural-risk observation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Finding kind
    pub kind: FindingKind,

    /// Function the finding is scoped to (`None` for parse failures)
    pub function_name: Option<String>,

    /// Human-readable message fed into the prompt
    pub message: String,
}

impl Finding {
    /// Division inside `function_name`
    #[must_use]
    pub fn division_risk(function_name: impl Into<String>) -> Self {
        let function_name = function_name.into();
        Self {
            kind: FindingKind::DivisionRisk,
            message: format!(
                "Function '{}' performs division, check for divide by zero errors.",
                function_name
            ),
            function_name: Some(function_name),
        }
    }

    /// No try statement inside `function_name`
    #[must_use]
    pub fn missing_exception_handling(function_name: impl Into<String>) -> Self {
        let function_name = function_name.into();
        Self {
            kind: FindingKind::MissingExceptionHandling,
            message: format!("Function '{}' has no exception handling.", function_name),
            function_name: Some(function_name),
        }
    }

    /// Source failed to parse
    #[must_use]
    pub fn parse_failure(error: &AnalysisError) -> Self {
        Self {
            kind: FindingKind::ParseFailure,
            function_name: None,
            message: format!("Error analyzing function: {}", error),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
