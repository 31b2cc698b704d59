//! Render syntax trees back to source-like text.
//!
//! Infix, prefix and ternary nodes are fully parenthesised so the output
//! shows how the parser grouped them: `1 + 2 * 3` renders as `(1 + (2 * 3))`.

use std::fmt::{self, Write};

use super::{Block, Expr, ExprKind, Program, Stmt, StmtKind, StrPart, StringInterner};

/// Syntax tree printer bound to the interner that owns its names.
#[derive(Clone, Copy)]
pub struct AstPrinter<'a> {
    interner: &'a StringInterner,
}

impl<'a> AstPrinter<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        AstPrinter { interner }
    }

    pub fn expr_to_string(&self, expr: &Expr) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_expr(&mut out, expr);
        out
    }

    pub fn block_to_string(&self, block: &Block) -> String {
        let mut out = String::new();
        let _ = self.write_block(&mut out, block);
        out
    }

    /// One statement per line.
    pub fn program_to_string(&self, program: &Program) -> String {
        let mut out = String::new();
        for stmt in &program.stmts {
            let _ = self.write_stmt(&mut out, stmt);
            out.push('\n');
        }
        out
    }

    fn write_stmt(&self, out: &mut String, stmt: &Stmt) -> fmt::Result {
        match &stmt.kind {
            StmtKind::Let { name, value } => {
                write!(out, "let {} = ", self.interner.lookup(*name))?;
                self.write_expr(out, value)?;
                out.push(';');
            }
            StmtKind::Return(value) => {
                out.push_str("return ");
                self.write_expr(out, value)?;
                out.push(';');
            }
            StmtKind::Expr(expr) => self.write_expr(out, expr)?,
        }
        Ok(())
    }

    fn write_block(&self, out: &mut String, block: &Block) -> fmt::Result {
        if block.stmts.is_empty() {
            out.push_str("{ }");
            return Ok(());
        }
        out.push_str("{ ");
        for (i, stmt) in block.stmts.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.write_stmt(out, stmt)?;
        }
        out.push_str(" }");
        Ok(())
    }

    fn write_list(&self, out: &mut String, items: &[std::rc::Rc<Expr>]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expr(out, item)?;
        }
        Ok(())
    }

    fn write_expr(&self, out: &mut String, expr: &Expr) -> fmt::Result {
        match &expr.kind {
            ExprKind::Ident(name) => out.push_str(self.interner.lookup(*name)),
            ExprKind::Int(n) => write!(out, "{n}")?,
            ExprKind::Bool(b) => write!(out, "{b}")?,
            ExprKind::Str(parts) => {
                out.push('"');
                for part in parts {
                    match part {
                        StrPart::Text(text) => {
                            for c in text.chars() {
                                match c {
                                    '"' => out.push_str("\\\""),
                                    '\\' => out.push_str("\\\\"),
                                    '\n' => out.push_str("\\n"),
                                    '\t' => out.push_str("\\t"),
                                    _ => out.push(c),
                                }
                            }
                        }
                        StrPart::Expr(inner) => {
                            out.push_str("${");
                            self.write_expr(out, inner)?;
                            out.push('}');
                        }
                    }
                }
                out.push('"');
            }
            ExprKind::Array(elements) => {
                out.push('[');
                self.write_list(out, elements)?;
                out.push(']');
            }
            ExprKind::Index { left, index } => {
                out.push('(');
                self.write_expr(out, left)?;
                out.push('[');
                self.write_expr(out, index)?;
                out.push_str("])");
            }
            ExprKind::Slice { left, lower, upper } => {
                self.write_expr(out, left)?;
                out.push('[');
                if let Some(lower) = lower {
                    self.write_expr(out, lower)?;
                }
                out.push(':');
                if let Some(upper) = upper {
                    self.write_expr(out, upper)?;
                }
                out.push(']');
            }
            ExprKind::Prefix { op, operand } => {
                write!(out, "({}", op.as_symbol())?;
                self.write_expr(out, operand)?;
                out.push(')');
            }
            ExprKind::Infix { op, left, right } => {
                out.push('(');
                self.write_expr(out, left)?;
                write!(out, " {} ", op.as_symbol())?;
                self.write_expr(out, right)?;
                out.push(')');
            }
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                out.push('(');
                self.write_expr(out, cond)?;
                out.push_str(" ? ");
                self.write_expr(out, then)?;
                out.push_str(" : ");
                self.write_expr(out, otherwise)?;
                out.push(')');
            }
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                out.push_str("if (");
                self.write_expr(out, cond)?;
                out.push_str(") ");
                self.write_block(out, then)?;
                if let Some(otherwise) = otherwise {
                    out.push_str(" else ");
                    self.write_block(out, otherwise)?;
                }
            }
            ExprKind::Function { params, body } => {
                out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(self.interner.lookup(*param));
                }
                out.push_str(") => ");
                self.write_block(out, body)?;
            }
            ExprKind::Call { callee, args } => {
                self.write_expr(out, callee)?;
                out.push('(');
                self.write_list(out, args)?;
                out.push(')');
            }
            ExprKind::Subscribe { source, handler } => {
                write!(
                    out,
                    "{} ~> {}",
                    self.interner.lookup(*source),
                    self.interner.lookup(*handler)
                )?;
            }
        }
        Ok(())
    }
}
