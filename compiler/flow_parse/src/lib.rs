//! Parser for Flow.
//!
//! Recursive descent for statements, Pratt-style precedence climbing for
//! expressions. Parsing stops at the first error.

mod cursor;
mod error;
mod grammar;

#[cfg(test)]
mod tests;

use cursor::Cursor;
use flow_ir::{Program, StringInterner, TokenList};

pub use error::ParseError;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens.as_slice()),
            interner,
        }
    }

    /// Parse every statement up to end of input.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        while !self.cursor.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Program { stmts })
    }
}

/// Parse a token list into a program.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<Program, ParseError> {
    let program = Parser::new(tokens, interner).parse_program()?;
    tracing::debug!(stmts = program.stmts.len(), "parsed program");
    Ok(program)
}

/// Lex and parse source text.
pub fn parse_source(source: &str, interner: &StringInterner) -> Result<Program, ParseError> {
    let tokens = flow_lexer::lex(source, interner)?;
    parse(&tokens, interner)
}
