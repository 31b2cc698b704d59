//! Tree-walking interpreter.
//!
//! Every node is peeled (one level of reference substitution) right
//! before it is evaluated, so identifiers always read the latest bindings.
//! `let`, assignment and subscription live in `bindings`, calls in `call`,
//! strings and arrays in `collections`.

mod bindings;
mod builder;
mod call;
mod collections;

pub use builder::InterpreterBuilder;

use std::rc::Rc;

use flow_ir::{BinaryOp, Block, Expr, ExprKind, Name, Program, SharedInterner, Stmt, StmtKind};

use crate::call_stack::CallStack;
use crate::dependencies::Dependencies;
use crate::environment::Environment;
use crate::errors::{unknown_identifier, EvalResult};
use crate::natives::NativeRegistry;
use crate::operators::evaluate_binary;
use crate::output::SharedOutput;
use crate::signal::TraceIds;
use crate::substitute::Substitution;
use crate::unary_operators::evaluate_unary;
use crate::value::Value;

/// State shared by the interpreter and the signal handlers it installs.
///
/// Handlers hold a `Weak` to this, so dropping the interpreter tears the
/// whole graph down.
pub(crate) struct EvalContext {
    interner: SharedInterner,
    natives: NativeRegistry,
    output: SharedOutput,
    trace_ids: TraceIds,
    call_stack: CallStack,
    deps: Dependencies,
    global: Environment,
}

/// Flow interpreter.
///
/// Bindings persist in the global environment across
/// [`eval_program`](Self::eval_program) calls, so a REPL can keep one
/// interpreter and observe reactive updates line by line.
pub struct Interpreter {
    ctx: Rc<EvalContext>,
}

impl Interpreter {
    /// An interpreter with the builtins, stdout printing and the default
    /// recursion limit.
    pub fn new(interner: &SharedInterner) -> Self {
        InterpreterBuilder::new(interner).build()
    }

    fn from_context(ctx: Rc<EvalContext>) -> Self {
        Interpreter { ctx }
    }

    /// Evaluate a program in the global environment.
    ///
    /// `Ok` carries the last statement's value, or the first `Error` value
    /// raised; `Err` is a fault.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = program.stmts.len()))]
    pub fn eval_program(&self, program: &Program) -> EvalResult {
        let global = self.ctx.global.clone();
        let result = self.eval_stmts(&program.stmts, &global)?;
        Ok(result.unwrap_return())
    }

    pub fn global_env(&self) -> &Environment {
        &self.ctx.global
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.ctx.interner
    }

    pub fn output(&self) -> &SharedOutput {
        &self.ctx.output
    }

    /// Render a value the way `print` does.
    pub fn inspect(&self, value: &Value) -> String {
        value.inspect(&self.ctx.interner)
    }

    /// Evaluate one expression in `env`.
    pub fn eval_expr(&self, expr: &Rc<Expr>, env: &Environment) -> EvalResult {
        flow_stack::ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&self, expr: &Rc<Expr>, env: &Environment) -> EvalResult {
        let expr = match self.substitution().peel(expr, env) {
            Ok(expr) => expr,
            Err(name) => return Ok(unknown_identifier(self.name(name))),
        };

        match &expr.kind {
            ExprKind::Ident(name) => self.eval_ident(*name, &expr, env),
            ExprKind::Int(n) => Ok(Value::int(*n)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Str(parts) => self.eval_template(parts, env),
            ExprKind::Array(items) => self.eval_array(items, env),
            ExprKind::Index { left, index } => self.eval_index(left, index, env),
            ExprKind::Slice { left, lower, upper } => {
                self.eval_slice(left, lower.as_ref(), upper.as_ref(), env)
            }
            ExprKind::Prefix { op, operand } => {
                let operand = self.eval_expr(operand, env)?;
                if operand.is_abrupt() {
                    return Ok(operand);
                }
                Ok(evaluate_unary(*op, &operand))
            }
            ExprKind::Infix {
                op: BinaryOp::Assign,
                left,
                right,
            } => self.eval_assign(left, right, env),
            ExprKind::Infix { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                if left.is_abrupt() {
                    return Ok(left);
                }
                let right = self.eval_expr(right, env)?;
                if right.is_abrupt() {
                    return Ok(right);
                }
                evaluate_binary(&left, &right, *op)
            }
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.eval_expr(cond, env)?;
                if cond.is_abrupt() {
                    return Ok(cond);
                }
                if cond.is_truthy() {
                    self.eval_expr(then, env)
                } else {
                    self.eval_expr(otherwise, env)
                }
            }
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.eval_expr(cond, env)?;
                if cond.is_abrupt() {
                    return Ok(cond);
                }
                if cond.is_truthy() {
                    self.eval_block(then, env)
                } else if let Some(otherwise) = otherwise {
                    self.eval_block(otherwise, env)
                } else {
                    Ok(Value::Null)
                }
            }
            ExprKind::Function { params, body } => Ok(Value::function(
                params.clone(),
                Rc::clone(body),
                env.clone(),
            )),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, env),
            ExprKind::Subscribe { source, handler } => {
                self.eval_subscribe(*source, *handler, env)
            }
        }
    }

    /// An identifier that survived peeling: a native, or a binding whose
    /// expression is itself an identifier.
    fn eval_ident(&self, name: Name, expr: &Rc<Expr>, env: &Environment) -> EvalResult {
        if env.get(name).is_some() {
            return self.eval_expr(expr, env);
        }
        match self.ctx.natives.get(name) {
            Some(native) => Ok(Value::Native(native)),
            None => Ok(unknown_identifier(self.name(name))),
        }
    }

    /// `if` and function bodies. `if` blocks share the enclosing scope.
    pub(crate) fn eval_block(&self, block: &Block, env: &Environment) -> EvalResult {
        self.eval_stmts(&block.stmts, env)
    }

    /// Statements in order; the first `Error` or `return` ends the sequence.
    fn eval_stmts(&self, stmts: &[Stmt], env: &Environment) -> EvalResult {
        let mut result = Value::Null;
        for stmt in stmts {
            result = self.eval_stmt(stmt, env)?;
            if result.is_abrupt() {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_stmt(&self, stmt: &Stmt, env: &Environment) -> EvalResult {
        match &stmt.kind {
            StmtKind::Let { name, value } => self.eval_let(*name, value, env),
            StmtKind::Return(value) => {
                let value = self.eval_expr(value, env)?;
                if value.is_abrupt() {
                    return Ok(value);
                }
                Ok(Value::Return(Box::new(value)))
            }
            StmtKind::Expr(expr) => self.eval_expr(expr, env),
        }
    }

    fn substitution(&self) -> Substitution<'_> {
        Substitution::new(&self.ctx.natives, &self.ctx.deps)
    }

    #[inline]
    fn name(&self, name: Name) -> &'static str {
        self.ctx.interner.lookup(name)
    }
}
