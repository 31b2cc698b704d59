//! Parse error type.

use flow_ir::Span;
use flow_lexer::LexError;

/// A parse error: what went wrong and where.
///
/// Lex errors surface through the same type so callers that go from
/// source text to a [`Program`](flow_ir::Program) handle one error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            span: err.span(),
            message: err.to_string(),
        }
    }
}
