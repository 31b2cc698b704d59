//! String literal bodies: escape decoding and `${…}` segments.
//!
//! A segment is lexed and parsed as a standalone expression; its token
//! spans are shifted so diagnostics point into the enclosing source.
//! Segments may contain string literals, templates included.

use flow_ir::{Span, StrPart, Token, TokenList};
use flow_lexer::segment_end;

use crate::{ParseError, Parser};

use super::expr::Prec;

impl Parser<'_> {
    /// Split a raw string body into text and expression parts.
    ///
    /// `body_start` is the source offset of the first byte after the
    /// opening quote.
    pub(crate) fn parse_template(
        &self,
        raw: &str,
        body_start: u32,
    ) -> Result<Vec<StrPart>, ParseError> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        return Err(ParseError::new(
                            "dangling `\\` in string literal",
                            span_at(body_start, i, 1),
                        ));
                    };
                    text.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '"' => '"',
                        '\\' => '\\',
                        '$' => '$',
                        other => {
                            return Err(ParseError::new(
                                format!("unknown escape sequence `\\{other}`"),
                                span_at(body_start, i, 1 + other.len_utf8()),
                            ));
                        }
                    });
                }
                '$' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    let inner_start = i + 2;
                    let Some(inner_end) = segment_end(raw, inner_start) else {
                        return Err(ParseError::new(
                            "unterminated `${` in string template",
                            span_at(body_start, i, 2),
                        ));
                    };
                    if !text.is_empty() {
                        parts.push(StrPart::Text(std::mem::take(&mut text)));
                    }
                    let segment = self.parse_segment(
                        &raw[inner_start..inner_end],
                        offset(body_start, inner_start),
                    )?;
                    parts.push(StrPart::Expr(segment));
                    // Skip to the closing brace.
                    while chars.next_if(|&(j, _)| j <= inner_end).is_some() {}
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            parts.push(StrPart::Text(text));
        }
        Ok(parts)
    }

    fn parse_segment(
        &self,
        source: &str,
        base: u32,
    ) -> Result<std::rc::Rc<flow_ir::Expr>, ParseError> {
        if source.trim().is_empty() {
            return Err(ParseError::new(
                "empty `${}` in string template",
                Span::new(base, base),
            ));
        }
        let tokens = flow_lexer::lex(source, self.interner).map_err(|e| {
            let err = ParseError::from(e);
            ParseError::new(err.message, err.span.offset(base))
        })?;
        let tokens = shift_spans(&tokens, base);

        let mut parser = Parser::new(&tokens, self.interner);
        let expr = parser.parse_expr(Prec::Lowest)?;
        if !parser.cursor.is_at_end() {
            return Err(parser.cursor.unexpected("`}`"));
        }
        Ok(expr)
    }
}

fn offset(base: u32, index: usize) -> u32 {
    base.saturating_add(u32::try_from(index).unwrap_or(u32::MAX))
}

fn span_at(base: u32, index: usize, len: usize) -> Span {
    let start = offset(base, index);
    Span::new(start, offset(start, len))
}

/// Shift every span in a token list by `base` bytes.
fn shift_spans(tokens: &TokenList, base: u32) -> TokenList {
    let mut shifted = TokenList::new();
    for token in tokens {
        shifted.push(Token::new(token.kind.clone(), token.span.offset(base)));
    }
    shifted
}
