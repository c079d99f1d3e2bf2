//! Everything that can go wrong in this crate is detected
//! synchronously, and nothing is retried.  Malformed text is the only
//! failure mode of the core: once a `Term` exists, variable analysis,
//! stratification and wire encoding are total.
use thiserror::Error;

/// Malformed S-expression text.  Offsets are byte offsets into the
/// input.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum SyntaxError {
    #[error("expected a term, found only whitespace")]
    EmptyInput,
    #[error("unexpected end of input at offset {offset}: missing closing parenthesis")]
    UnexpectedEnd { offset: usize },
    #[error("unexpected closing parenthesis at offset {offset}")]
    UnexpectedClose { offset: usize },
    #[error("trailing input after complete term at offset {offset}")]
    TrailingInput { offset: usize },
}

impl SyntaxError {
    /// Returns the byte offset where the error was detected, if any.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::EmptyInput => None,
            SyntaxError::UnexpectedEnd { offset }
            | SyntaxError::UnexpectedClose { offset }
            | SyntaxError::TrailingInput { offset } => Some(*offset),
        }
    }
}

/// Failures of the compilation pipeline in `crate::compile`.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("malformed compiled rule `{rule}`: {reason}")]
    MalformedRule { rule: String, reason: &'static str },
}

/// Failures while loading a `CompilerConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("computation tag must not be empty")]
    EmptyComputationTag,
}

#[test]
fn test_offsets() {
    assert_eq!(SyntaxError::EmptyInput.offset(), None);
    assert_eq!(SyntaxError::UnexpectedEnd { offset: 7 }.offset(), Some(7));
    assert_eq!(SyntaxError::TrailingInput { offset: 3 }.offset(), Some(3));
}

#[test]
fn test_messages() {
    assert_eq!(
        SyntaxError::UnexpectedClose { offset: 0 }.to_string(),
        "unexpected closing parenthesis at offset 0"
    );

    let err: CompileError = SyntaxError::EmptyInput.into();
    assert_eq!(err.to_string(), "expected a term, found only whitespace");
}
