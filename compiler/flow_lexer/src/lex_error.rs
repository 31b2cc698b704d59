//! Lexer error types.

use flow_ir::Span;

/// A lexer error. Lexing stops at the first one.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{text}`")]
    UnexpectedChar { text: String, span: Span },
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("integer literal `{text}` does not fit in 64 bits")]
    IntegerOverflow { text: String, span: Span },
    #[error("source exceeds {} bytes", u32::MAX)]
    SourceTooLarge,
}

impl LexError {
    /// Location of the offending text.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::IntegerOverflow { span, .. } => *span,
            LexError::SourceTooLarge => Span::DUMMY,
        }
    }
}
