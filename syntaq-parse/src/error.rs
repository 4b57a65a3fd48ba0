use serde::{Deserialize, Serialize};

/// Errors that abort parsing.
///
/// Malformed markup never produces an error. It degrades to literal text and,
/// at most, a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Block {block_index} nests {depth} levels deep (limit is {limit})")]
    NestingTooDeep {
        block_index: usize,
        depth: usize,
        limit: usize,
    },
}

/// A diagnostic message produced during parsing or validation.
///
/// Diagnostics are non-fatal: the parser continues and produces a best-effort
/// result even when diagnostics are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based source line, where one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: &str, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line,
            code: Some(code.to_string()),
        }
    }

    pub fn info(code: &str, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            line,
            code: Some(code.to_string()),
        }
    }
}

/// A parse failure reported alongside ordinary diagnostics, as an error with
/// no line or code.
impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Self {
            severity: Severity::Error,
            message: err.to_string(),
            line: None,
            code: None,
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_becomes_error_diagnostic() {
        let err = ParseError::NestingTooDeep {
            block_index: 3,
            depth: 5,
            limit: 4,
        };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "Block 3 nests 5 levels deep (limit is 4)");
        assert_eq!(diag.line, None);
        assert_eq!(diag.code, None);
    }
}
