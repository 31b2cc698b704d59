//! Lexer for Flow using logos.
//!
//! Produces a [`TokenList`] ending in [`TokenKind::Eof`]. Whitespace and
//! `//` comments are dropped. String literals keep their body in source
//! form; the parser decodes escapes and splits `${…}` segments.

mod lex_error;
mod raw_token;
mod strings;

use flow_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;
use raw_token::{Quote, RawToken};

pub use lex_error::LexError;
pub use strings::segment_end;

/// Lex source code into a token list.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::try_from_range(logos.span()).map_err(|_| LexError::SourceTooLarge)?;
        let slice = logos.slice();

        let Ok(raw) = token_result else {
            return Err(LexError::UnexpectedChar {
                text: slice.to_owned(),
                span,
            });
        };

        if let Some(kind) = convert_token(raw, slice, span, interner)? {
            result.push(Token::new(kind, span));
        }
    }

    let eof = u32::try_from(source.len()).map_err(|_| LexError::SourceTooLarge)?;
    result.push(Token::new(TokenKind::Eof, Span::new(eof, eof)));

    Ok(result)
}

/// Convert a raw token to a `TokenKind`, interning identifiers.
///
/// Returns `None` for trivia.
fn convert_token(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<Option<TokenKind>, LexError> {
    let kind = match raw {
        RawToken::LineComment => return Ok(None),
        RawToken::String(Quote::Unclosed) => return Err(LexError::UnterminatedString { span }),

        // Literals
        RawToken::Int => {
            TokenKind::Int(slice.parse().map_err(|_| LexError::IntegerOverflow {
                text: slice.to_owned(),
                span,
            })?)
        }
        RawToken::String(Quote::Closed) => TokenKind::Str(slice[1..slice.len() - 1].to_owned()),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        // Keywords
        RawToken::Let => TokenKind::Let,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Return => TokenKind::Return,

        // Operators
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::FatArrow => TokenKind::FatArrow,
        RawToken::Eq => TokenKind::Assign,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Subscribe => TokenKind::Subscribe,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,

        // Delimiters
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
    };
    Ok(Some(kind))
}
