//! Reference substitution.
//!
//! Rewrites an expression so its free identifiers are replaced by the
//! expressions they are bound to. Nodes are never edited: a rewrite builds
//! new parents along the changed path and shares every untouched subtree.
//!
//! Three entry points:
//!
//! - [`Substitution::peel`] resolves identifiers one binding deep, right
//!   before a node is evaluated.
//! - [`Substitution::close`] resolves identifiers all the way down, giving a
//!   snapshot that means the same thing in any scope. Call arguments are
//!   closed against the caller before they are bound in the callee.
//! - [`Substitution::detach`] resolves only references that lead back to the
//!   name being (re)bound, so `x = x + 1` reads the old `x` instead of
//!   referring to itself.
//!
//! Every binding resolved by `peel` or `close` is recorded as a dependency
//! of the binding currently being evaluated.

use std::rc::Rc;

use flow_ir::{BinaryOp, Block, Expr, ExprKind, Name, Stmt, StmtKind, StrPart};

use crate::dependencies::Dependencies;
use crate::environment::{Binding, Environment};
use crate::natives::NativeRegistry;

pub(crate) struct Substitution<'a> {
    natives: &'a NativeRegistry,
    deps: &'a Dependencies,
}

impl<'a> Substitution<'a> {
    pub(crate) fn new(natives: &'a NativeRegistry, deps: &'a Dependencies) -> Self {
        Substitution { natives, deps }
    }

    /// Resolve the identifiers that evaluating `expr` reads first.
    ///
    /// An identifier becomes its bound expression: as-is in the root scope,
    /// closed against its defining scope anywhere else. Prefix and infix
    /// operands are peeled recursively; index and slice only peel the
    /// indexed operand. Assignments and every other form come back
    /// unchanged and are handled piecewise by the evaluator.
    ///
    /// Fails with the offending name when an identifier is neither bound
    /// nor a native.
    pub(crate) fn peel(&self, expr: &Rc<Expr>, env: &Environment) -> Result<Rc<Expr>, Name> {
        flow_stack::ensure_sufficient_stack(|| self.peel_inner(expr, env))
    }

    fn peel_inner(&self, expr: &Rc<Expr>, env: &Environment) -> Result<Rc<Expr>, Name> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                if let Some((binding, scope)) = env.lookup(*name) {
                    self.deps.record(&binding.signal);
                    if env.is_root() {
                        return Ok(binding.expr);
                    }
                    tracing::trace!(name = name.raw(), "closing nested binding");
                    return Ok(self.closer(true).close_binding(*name, &binding, &scope));
                }
                if self.natives.contains(*name) {
                    return Ok(Rc::clone(expr));
                }
                Err(*name)
            }
            ExprKind::Prefix { op, operand } => {
                let operand_new = self.peel(operand, env)?;
                if Rc::ptr_eq(&operand_new, operand) {
                    return Ok(Rc::clone(expr));
                }
                Ok(Expr::new(
                    ExprKind::Prefix {
                        op: *op,
                        operand: operand_new,
                    },
                    expr.span,
                ))
            }
            ExprKind::Infix {
                op: BinaryOp::Assign,
                ..
            } => Ok(Rc::clone(expr)),
            ExprKind::Infix { op, left, right } => {
                let left_new = self.peel(left, env)?;
                let right_new = self.peel(right, env)?;
                if Rc::ptr_eq(&left_new, left) && Rc::ptr_eq(&right_new, right) {
                    return Ok(Rc::clone(expr));
                }
                Ok(Expr::new(
                    ExprKind::Infix {
                        op: *op,
                        left: left_new,
                        right: right_new,
                    },
                    expr.span,
                ))
            }
            ExprKind::Index { left, index } => {
                let left_new = self.peel(left, env)?;
                if Rc::ptr_eq(&left_new, left) {
                    return Ok(Rc::clone(expr));
                }
                Ok(Expr::new(
                    ExprKind::Index {
                        left: left_new,
                        index: Rc::clone(index),
                    },
                    expr.span,
                ))
            }
            ExprKind::Slice { left, lower, upper } => {
                let left_new = self.peel(left, env)?;
                if Rc::ptr_eq(&left_new, left) {
                    return Ok(Rc::clone(expr));
                }
                Ok(Expr::new(
                    ExprKind::Slice {
                        left: left_new,
                        lower: lower.clone(),
                        upper: upper.clone(),
                    },
                    expr.span,
                ))
            }
            _ => Ok(Rc::clone(expr)),
        }
    }

    /// Resolve every free identifier of `expr` against `env`, recursively.
    ///
    /// Identifiers bound nowhere (natives, or names that will fail at
    /// evaluation) and parameters or `let` names local to a nested function
    /// literal are left alone.
    pub(crate) fn close(&self, expr: &Rc<Expr>, env: &Environment) -> Rc<Expr> {
        self.closer(true).close(expr, env)
    }

    /// Record every binding that evaluating `expr` in `env` could read:
    /// both sides of every branch, and the bodies of functions it calls.
    pub(crate) fn record_reads(&self, expr: &Rc<Expr>, env: &Environment) {
        self.closer(true).close(expr, env);
    }

    /// Replace the references in `expr` that lead back to `target`.
    ///
    /// A direct `target` becomes a snapshot of its current binding. A name
    /// bound in the current scope whose expression reaches `target` is
    /// inlined and detached in turn. Nothing inside function literals is
    /// touched, and the left side of an assignment stays an identifier.
    pub(crate) fn detach(&self, expr: &Rc<Expr>, target: Name, env: &Environment) -> Rc<Expr> {
        let mut detacher = Detacher {
            closer: self.closer(false),
            target,
            env,
            visiting: Vec::new(),
        };
        detacher.detach(expr)
    }

    fn closer(&self, record: bool) -> Closer<'_> {
        Closer {
            deps: self.deps,
            active: Vec::new(),
            locals: Vec::new(),
            record,
        }
    }
}

/// State of one `close` walk.
struct Closer<'a> {
    deps: &'a Dependencies,
    /// Bindings currently being expanded; a name inside its own expansion
    /// resolves one scope further out.
    active: Vec<(Name, Environment)>,
    /// Names bound inside a function literal or block being closed.
    locals: Vec<Name>,
    record: bool,
}

impl Closer<'_> {
    fn close(&mut self, expr: &Rc<Expr>, env: &Environment) -> Rc<Expr> {
        flow_stack::ensure_sufficient_stack(|| self.close_inner(expr, env))
    }

    fn close_inner(&mut self, expr: &Rc<Expr>, env: &Environment) -> Rc<Expr> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                if self.locals.contains(name) {
                    return Rc::clone(expr);
                }
                match self.resolve(*name, env) {
                    Some((binding, scope)) => {
                        if self.record {
                            self.deps.record(&binding.signal);
                        }
                        self.close_binding(*name, &binding, &scope)
                    }
                    None => Rc::clone(expr),
                }
            }
            ExprKind::Function { params, body } => {
                let mark = self.locals.len();
                self.locals.extend(params.iter().copied());
                let body = self.close_block(body, env);
                self.locals.truncate(mark);
                Expr::new(
                    ExprKind::Function {
                        params: params.clone(),
                        body,
                    },
                    expr.span,
                )
            }
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.close(cond, env);
                let then = self.close_block(then, env);
                let otherwise = otherwise.as_ref().map(|block| self.close_block(block, env));
                Expr::new(
                    ExprKind::If {
                        cond,
                        then,
                        otherwise,
                    },
                    expr.span,
                )
            }
            _ => map_children(expr, &mut |child| self.close(child, env)),
        }
    }

    /// `let` names of a block are local to it.
    fn close_block(&mut self, block: &Rc<Block>, env: &Environment) -> Rc<Block> {
        let mark = self.locals.len();
        self.locals.extend(block.stmts.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::Let { name, .. } => Some(*name),
            _ => None,
        }));
        let stmts = block
            .stmts
            .iter()
            .map(|stmt| map_stmt(stmt, &mut |e| self.close(e, env)))
            .collect();
        self.locals.truncate(mark);
        Block::new(stmts, block.span)
    }

    /// Expand `binding` (bound to `name` in `scope`), closed against `scope`.
    fn close_binding(&mut self, name: Name, binding: &Binding, scope: &Environment) -> Rc<Expr> {
        self.active.push((name, scope.clone()));
        let saved = std::mem::take(&mut self.locals);
        let closed = self.close(&binding.expr, scope);
        self.locals = saved;
        self.active.pop();
        closed
    }

    /// Like [`Environment::lookup`], skipping bindings under expansion.
    fn resolve(&self, name: Name, env: &Environment) -> Option<(Binding, Environment)> {
        let mut scope = env.clone();
        loop {
            let expanding = self
                .active
                .iter()
                .any(|(n, s)| *n == name && s.ptr_eq(&scope));
            if !expanding {
                if let Some(binding) = scope.get_local(name) {
                    if !binding.is_self_reference(name) {
                        return Some((binding, scope));
                    }
                }
            }
            scope = scope.outer()?;
        }
    }
}

struct Detacher<'a> {
    closer: Closer<'a>,
    target: Name,
    env: &'a Environment,
    /// Current-scope names being inlined, to stop on reference cycles.
    visiting: Vec<Name>,
}

impl Detacher<'_> {
    fn detach(&mut self, expr: &Rc<Expr>) -> Rc<Expr> {
        flow_stack::ensure_sufficient_stack(|| self.detach_inner(expr))
    }

    fn detach_inner(&mut self, expr: &Rc<Expr>) -> Rc<Expr> {
        match &expr.kind {
            ExprKind::Ident(name) if *name == self.target => match self.env.lookup(*name) {
                Some((binding, scope)) => self.closer.close_binding(*name, &binding, &scope),
                None => Rc::clone(expr),
            },
            ExprKind::Ident(name) => {
                let Some(binding) = self.env.get_local(*name) else {
                    return Rc::clone(expr);
                };
                if binding.is_self_reference(*name)
                    || self.visiting.contains(name)
                    || !self.reaches_target(&binding.expr)
                {
                    return Rc::clone(expr);
                }
                self.visiting.push(*name);
                let inlined = self.detach(&binding.expr);
                self.visiting.pop();
                inlined
            }
            ExprKind::Function { .. } => Rc::clone(expr),
            _ => map_children(expr, &mut |child| self.detach(child)),
        }
    }

    /// Whether `expr` mentions the target, directly or through
    /// current-scope bindings.
    fn reaches_target(&self, expr: &Rc<Expr>) -> bool {
        let mut seen = self.visiting.clone();
        reaches(expr, self.target, self.env, &mut seen)
    }
}

fn reaches(expr: &Rc<Expr>, target: Name, env: &Environment, seen: &mut Vec<Name>) -> bool {
    match &expr.kind {
        ExprKind::Ident(name) if *name == target => true,
        ExprKind::Ident(name) => {
            if seen.contains(name) {
                return false;
            }
            seen.push(*name);
            match env.get_local(*name) {
                Some(binding) if !binding.is_self_reference(*name) => {
                    reaches(&binding.expr, target, env, seen)
                }
                _ => false,
            }
        }
        ExprKind::Function { .. } => false,
        _ => {
            let mut found = false;
            map_children(expr, &mut |child| {
                if !found {
                    found = reaches(child, target, env, seen);
                }
                Rc::clone(child)
            });
            found
        }
    }
}

/// Rebuild `expr` with `f` applied to each direct child expression,
/// including the statements of `if` blocks.
///
/// Function literals and leaves are returned as-is. The target of an
/// assignment is not a child: it always stays an identifier.
fn map_children(expr: &Rc<Expr>, f: &mut dyn FnMut(&Rc<Expr>) -> Rc<Expr>) -> Rc<Expr> {
    let kind = match &expr.kind {
        ExprKind::Ident(_)
        | ExprKind::Int(_)
        | ExprKind::Bool(_)
        | ExprKind::Subscribe { .. }
        | ExprKind::Function { .. } => return Rc::clone(expr),
        ExprKind::Str(parts) => ExprKind::Str(
            parts
                .iter()
                .map(|part| match part {
                    StrPart::Text(text) => StrPart::Text(text.clone()),
                    StrPart::Expr(inner) => StrPart::Expr(f(inner)),
                })
                .collect(),
        ),
        ExprKind::Array(items) => ExprKind::Array(items.iter().map(|item| f(item)).collect()),
        ExprKind::Index { left, index } => ExprKind::Index {
            left: f(left),
            index: f(index),
        },
        ExprKind::Slice { left, lower, upper } => ExprKind::Slice {
            left: f(left),
            lower: lower.as_ref().map(|e| f(e)),
            upper: upper.as_ref().map(|e| f(e)),
        },
        ExprKind::Prefix { op, operand } => ExprKind::Prefix {
            op: *op,
            operand: f(operand),
        },
        ExprKind::Infix {
            op: BinaryOp::Assign,
            left,
            right,
        } => ExprKind::Infix {
            op: BinaryOp::Assign,
            left: Rc::clone(left),
            right: f(right),
        },
        ExprKind::Infix { op, left, right } => ExprKind::Infix {
            op: *op,
            left: f(left),
            right: f(right),
        },
        ExprKind::Ternary {
            cond,
            then,
            otherwise,
        } => ExprKind::Ternary {
            cond: f(cond),
            then: f(then),
            otherwise: f(otherwise),
        },
        ExprKind::If {
            cond,
            then,
            otherwise,
        } => ExprKind::If {
            cond: f(cond),
            then: map_block(then, &mut *f),
            otherwise: otherwise.as_ref().map(|block| map_block(block, &mut *f)),
        },
        ExprKind::Call { callee, args } => ExprKind::Call {
            callee: f(callee),
            args: args.iter().map(|arg| f(arg)).collect(),
        },
    };
    Expr::new(kind, expr.span)
}

fn map_block(block: &Rc<Block>, f: &mut dyn FnMut(&Rc<Expr>) -> Rc<Expr>) -> Rc<Block> {
    let stmts = block
        .stmts
        .iter()
        .map(|stmt| map_stmt(stmt, &mut *f))
        .collect();
    Block::new(stmts, block.span)
}

fn map_stmt(stmt: &Stmt, f: &mut dyn FnMut(&Rc<Expr>) -> Rc<Expr>) -> Stmt {
    let kind = match &stmt.kind {
        StmtKind::Let { name, value } => StmtKind::Let {
            name: *name,
            value: f(value),
        },
        StmtKind::Return(value) => StmtKind::Return(f(value)),
        StmtKind::Expr(value) => StmtKind::Expr(f(value)),
    };
    Stmt::new(kind, stmt.span)
}
