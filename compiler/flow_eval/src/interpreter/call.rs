//! Function calls.

use std::rc::Rc;

use flow_ir::Expr;

use super::Interpreter;
use crate::environment::{Binding, Environment};
use crate::errors::{arity_mismatch, not_callable, EvalResult};
use crate::natives::NativeCtx;
use crate::signal::Signal;
use crate::value::{FunctionValue, NativeFunction, Value};

impl Interpreter {
    pub(super) fn eval_call(
        &self,
        callee: &Rc<Expr>,
        args: &[Rc<Expr>],
        env: &Environment,
    ) -> EvalResult {
        let function = self.eval_expr(callee, env)?;
        match function {
            Value::Function(func) => self.call_function(&func, args, env),
            Value::Native(native) => self.call_native(native, args, env),
            Value::Error(_) | Value::Return(_) => Ok(function),
            other => Ok(not_callable(&other)),
        }
    }

    /// Arguments are not evaluated here. Each parameter is bound, like a
    /// `let`, to its argument closed against the caller's scope, so the
    /// callee sees the caller's bindings as they are when it reads them.
    fn call_function(
        &self,
        func: &FunctionValue,
        args: &[Rc<Expr>],
        env: &Environment,
    ) -> EvalResult {
        if func.params.len() != args.len() {
            return Ok(arity_mismatch(func.params.len(), args.len()));
        }
        let _guard = self.ctx.call_stack.enter()?;

        let subst = self.substitution();
        let call_env = Environment::enclosed(&func.env);
        for (param, arg) in func.params.iter().zip(args) {
            let frame = self.ctx.deps.frame();
            let closed = subst.close(arg, env);
            let signal = Signal::new();
            for dep in frame.finish() {
                signal.observe(&dep);
            }
            call_env.set(*param, Binding::new(closed, signal));
        }

        let result = self.eval_block(&func.body, &call_env)?;
        Ok(result.unwrap_return())
    }

    /// Natives take evaluated arguments, left to right.
    fn call_native(
        &self,
        native: NativeFunction,
        args: &[Rc<Expr>],
        env: &Environment,
    ) -> EvalResult {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval_expr(arg, env)?;
            if value.is_abrupt() {
                return Ok(value);
            }
            values.push(value);
        }
        let ctx = NativeCtx {
            interner: &self.ctx.interner,
            output: &self.ctx.output,
        };
        Ok((native.func)(&ctx, &values))
    }
}
