//! Statement and block parsing.

use std::rc::Rc;

use flow_ir::{Block, Stmt, StmtKind, TokenKind};

use crate::{ParseError, Parser};

use super::expr::Prec;

impl Parser<'_> {
    /// `let name = expr;` | `return expr;` | `expr;`
    ///
    /// The trailing semicolon is optional.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Let => {
                self.cursor.advance();
                let (name, _) = self.cursor.expect_ident()?;
                self.cursor.expect(&TokenKind::Assign)?;
                let value = self.parse_expr(Prec::Lowest)?;
                StmtKind::Let { name, value }
            }
            TokenKind::Return => {
                self.cursor.advance();
                StmtKind::Return(self.parse_expr(Prec::Lowest)?)
            }
            _ => StmtKind::Expr(self.parse_expr(Prec::Lowest)?),
        };
        self.cursor.eat(&TokenKind::Semicolon);
        Ok(Stmt::new(kind, start.merge(self.cursor.previous_span())))
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<Rc<Block>, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.unexpected("`}`"));
            }
            stmts.push(self.parse_stmt()?);
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Block::new(stmts, start.merge(end)))
    }
}
