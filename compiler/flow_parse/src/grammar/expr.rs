//! Expression parsing.
//!
//! Binding power, loosest first:
//!
//! | level         | operators        | associativity |
//! |---------------|------------------|---------------|
//! | `Assign`      | `=`              | right         |
//! | `Ternary`     | `? :`            | right         |
//! | `Equals`      | `== !=`          | left          |
//! | `LessGreater` | `< >`            | left          |
//! | `Sum`         | `+ -`            | left          |
//! | `Product`     | `* /`            | left          |
//! | `Prefix`      | `! -`            | -             |
//! | `Call`        | `f(…)` `a[…]`    | left          |

use std::rc::Rc;

use flow_ir::{BinaryOp, Block, Expr, ExprKind, Stmt, StmtKind, TokenKind, UnaryOp};
use tracing::debug;

use crate::{ParseError, Parser};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Prec {
    Lowest,
    Assign,
    Ternary,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Prec {
    fn of(kind: &TokenKind) -> Prec {
        match kind {
            TokenKind::Assign => Prec::Assign,
            TokenKind::Question => Prec::Ternary,
            TokenKind::EqEq | TokenKind::NotEq => Prec::Equals,
            TokenKind::Lt | TokenKind::Gt => Prec::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Prec::Sum,
            TokenKind::Star | TokenKind::Slash => Prec::Product,
            TokenKind::LParen | TokenKind::LBracket => Prec::Call,
            _ => Prec::Lowest,
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parse an expression whose operators all bind tighter than `prec`.
    ///
    /// Grows the stack on deep nesting.
    pub(crate) fn parse_expr(&mut self, prec: Prec) -> Result<Rc<Expr>, ParseError> {
        flow_stack::ensure_sufficient_stack(|| self.parse_expr_inner(prec))
    }

    fn parse_expr_inner(&mut self, prec: Prec) -> Result<Rc<Expr>, ParseError> {
        let mut left = self.parse_prefix()?;
        while prec < Prec::of(self.cursor.current_kind()) {
            left = self.parse_infix(left)?;
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Rc<Expr>, ParseError> {
        let token = self.cursor.current();
        let span = token.span;
        match &token.kind {
            TokenKind::Int(n) => {
                let n = *n;
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Int(n), span))
            }
            TokenKind::True | TokenKind::False => {
                let value = matches!(token.kind, TokenKind::True);
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Bool(value), span))
            }
            TokenKind::Str(raw) => {
                self.cursor.advance();
                let parts = self.parse_template(raw, span.start + 1)?;
                Ok(Expr::new(ExprKind::Str(parts), span))
            }
            TokenKind::Ident(name) => {
                let name = *name;
                self.cursor.advance();
                if self.cursor.eat(&TokenKind::Subscribe) {
                    let (handler, end) = self.cursor.expect_ident()?;
                    debug!(?name, ?handler, "parsed subscription");
                    return Ok(Expr::new(
                        ExprKind::Subscribe {
                            source: name,
                            handler,
                        },
                        span.merge(end),
                    ));
                }
                Ok(Expr::ident(name, span))
            }
            TokenKind::Bang | TokenKind::Minus => {
                let op = if matches!(token.kind, TokenKind::Bang) {
                    UnaryOp::Not
                } else {
                    UnaryOp::Neg
                };
                self.cursor.advance();
                let operand = self.parse_expr(Prec::Prefix)?;
                let span = span.merge(operand.span);
                Ok(Expr::new(ExprKind::Prefix { op, operand }, span))
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let elements = self.parse_list(&TokenKind::RBracket)?;
                let span = span.merge(self.cursor.previous_span());
                Ok(Expr::new(ExprKind::Array(elements), span))
            }
            TokenKind::LParen if self.at_function_literal() => self.parse_function(),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr(Prec::Lowest)?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::If => self.parse_if(),
            _ => Err(self.cursor.unexpected("expression")),
        }
    }

    fn parse_infix(&mut self, left: Rc<Expr>) -> Result<Rc<Expr>, ParseError> {
        let kind = self.cursor.current_kind();
        match kind {
            TokenKind::Assign => {
                self.cursor.advance();
                let right = self.parse_expr(Prec::Lowest)?;
                let span = left.span.merge(right.span);
                Ok(Expr::new(
                    ExprKind::Infix {
                        op: BinaryOp::Assign,
                        left,
                        right,
                    },
                    span,
                ))
            }
            TokenKind::Question => {
                self.cursor.advance();
                let then = self.parse_expr(Prec::Lowest)?;
                self.cursor.expect(&TokenKind::Colon)?;
                let otherwise = self.parse_expr(Prec::Assign)?;
                let span = left.span.merge(otherwise.span);
                Ok(Expr::new(
                    ExprKind::Ternary {
                        cond: left,
                        then,
                        otherwise,
                    },
                    span,
                ))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let args = self.parse_list(&TokenKind::RParen)?;
                let span = left.span.merge(self.cursor.previous_span());
                Ok(Expr::new(ExprKind::Call { callee: left, args }, span))
            }
            TokenKind::LBracket => self.parse_index(left),
            _ => {
                let prec = Prec::of(kind);
                let Some(op) = binary_op(kind) else {
                    return Err(self.cursor.unexpected("operator"));
                };
                self.cursor.advance();
                let right = self.parse_expr(prec)?;
                let span = left.span.merge(right.span);
                Ok(Expr::new(ExprKind::Infix { op, left, right }, span))
            }
        }
    }

    /// `left[index]`, `left[lower:upper]`, `left[:upper]`, `left[lower:]`, `left[:]`
    fn parse_index(&mut self, left: Rc<Expr>) -> Result<Rc<Expr>, ParseError> {
        self.cursor.expect(&TokenKind::LBracket)?;
        let lower = if self.cursor.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr(Prec::Lowest)?)
        };

        if self.cursor.eat(&TokenKind::Colon) {
            let upper = if self.cursor.check(&TokenKind::RBracket) {
                None
            } else {
                Some(self.parse_expr(Prec::Lowest)?)
            };
            let end = self.cursor.expect(&TokenKind::RBracket)?;
            let span = left.span.merge(end);
            return Ok(Expr::new(ExprKind::Slice { left, lower, upper }, span));
        }

        let end = self.cursor.expect(&TokenKind::RBracket)?;
        let Some(index) = lower else {
            return Err(ParseError::new("expected index expression", end));
        };
        let span = left.span.merge(end);
        Ok(Expr::new(ExprKind::Index { left, index }, span))
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    fn parse_list(&mut self, close: &TokenKind) -> Result<Vec<Rc<Expr>>, ParseError> {
        let mut items = Vec::new();
        if self.cursor.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expr(Prec::Lowest)?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }

    /// Whether the `(` under the cursor opens a parameter list:
    /// `()` or `(a, b, …)` followed by `=>`.
    fn at_function_literal(&self) -> bool {
        let mut i = 1;
        if matches!(self.cursor.peek_kind(i), TokenKind::RParen) {
            return matches!(self.cursor.peek_kind(i + 1), TokenKind::FatArrow);
        }
        loop {
            if !matches!(self.cursor.peek_kind(i), TokenKind::Ident(_)) {
                return false;
            }
            match self.cursor.peek_kind(i + 1) {
                TokenKind::Comma => i += 2,
                TokenKind::RParen => {
                    return matches!(self.cursor.peek_kind(i + 2), TokenKind::FatArrow);
                }
                _ => return false,
            }
        }
    }

    /// `(a, b) => { … }`
    fn parse_function(&mut self) -> Result<Rc<Expr>, ParseError> {
        let start = self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                let (name, span) = self.cursor.expect_ident()?;
                if params.contains(&name) {
                    return Err(ParseError::new(
                        format!("duplicate parameter `{}`", self.interner.lookup(name)),
                        span,
                    ));
                }
                params.push(name);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::FatArrow)?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok(Expr::new(ExprKind::Function { params, body }, span))
    }

    /// `if (cond) { … }`, optionally `else { … }` or `else if …`.
    fn parse_if(&mut self) -> Result<Rc<Expr>, ParseError> {
        let start = self.cursor.expect(&TokenKind::If)?;
        self.cursor.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr(Prec::Lowest)?;
        self.cursor.expect(&TokenKind::RParen)?;
        let then = self.parse_block()?;

        let otherwise = if self.cursor.eat(&TokenKind::Else) {
            if self.cursor.check(&TokenKind::If) {
                let nested = self.parse_if()?;
                let span = nested.span;
                Some(Block::new(
                    vec![Stmt::new(StmtKind::Expr(nested), span)],
                    span,
                ))
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        let end = otherwise.as_ref().map_or(then.span, |b| b.span);
        Ok(Expr::new(
            ExprKind::If {
                cond,
                then,
                otherwise,
            },
            start.merge(end),
        ))
    }
}
