//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived tokenizer output before
//! interning and final token conversion.

use logos::{Lexer, Logos};

use crate::strings::string_end;

/// Whether a string literal reached its closing quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quote {
    Closed,
    Unclosed,
}

/// Consume a string literal after its opening quote.
fn string_literal(lex: &mut Lexer<'_, RawToken>) -> Quote {
    let rest = lex.remainder();
    match string_end(rest.as_bytes(), 0) {
        Some(end) => {
            lex.bump(end);
            Quote::Closed
        }
        None => {
            lex.bump(rest.len());
            Quote::Unclosed
        }
    }
}

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("let")]
    Let,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+")]
    Int,
    #[token("\"", string_literal)]
    String(Quote),

    #[token("==")]
    EqEq,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("!")]
    Bang,
    #[token("~>")]
    Subscribe,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}
