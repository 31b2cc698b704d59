//! `let`, assignment and subscription: the operations that wire the signal
//! graph.

use std::rc::Rc;

use flow_ir::{AstPrinter, Expr, ExprKind, Name, Span};

use super::Interpreter;
use crate::environment::{Binding, Environment};
use crate::errors::{
    invalid_assignment_target, unknown_handler, unknown_identifier, EvalFault, EvalResult,
};
use crate::signal::{Signal, TraceId};
use crate::value::Value;

impl Interpreter {
    /// `let name = value;`
    ///
    /// Binds `name` in the current scope to `value` (with references back to
    /// `name` detached) and a fresh signal observing every binding `value`
    /// can read, on any branch. The value is evaluated once up front; an
    /// `Error` leaves the scope untouched.
    ///
    /// Rebinding a name already bound in this scope hands the old signal's
    /// observers to the new one.
    pub(super) fn eval_let(&self, name: Name, value: &Rc<Expr>, env: &Environment) -> EvalResult {
        let bound = self.substitution().detach(value, name, env);

        let frame = self.ctx.deps.frame();
        self.substitution().record_reads(&bound, env);
        let result = self.eval_expr(&bound, env)?;
        if result.is_abrupt() {
            frame.discard();
            return Ok(result);
        }
        let deps = frame.finish();

        let signal = Signal::new();
        for dep in &deps {
            signal.observe(dep);
        }
        if let Some(previous) = env.get_local(name) {
            signal.adopt_observers(&previous.signal);
        }
        install_rebind_handler(self.name(name), name, &signal, env);
        tracing::debug!(name = self.name(name), deps = deps.len(), "let");

        env.set(name, Binding::new(bound, signal));
        Ok(Value::Null)
    }

    /// `target = value`
    ///
    /// For a binding of the current scope: rebinds it, keeps its signal so
    /// observers stay attached, re-points the signal's dependency edges,
    /// then notifies it with a fresh trace id.
    ///
    /// For a binding of an enclosing scope: shadows it here with a new
    /// signal and notifies the outer signal, whose own edges stay as they
    /// are.
    pub(super) fn eval_assign(
        &self,
        target: &Rc<Expr>,
        value: &Rc<Expr>,
        env: &Environment,
    ) -> EvalResult {
        let Some(name) = target.as_ident() else {
            let printer = AstPrinter::new(&self.ctx.interner);
            return Ok(invalid_assignment_target(printer.expr_to_string(target)));
        };
        let Some((current, owner)) = env.lookup(name) else {
            return Ok(unknown_identifier(self.name(name)));
        };

        let bound = self.substitution().detach(value, name, env);
        let frame = self.ctx.deps.frame();
        self.substitution().record_reads(&bound, env);
        let result = self.eval_expr(&bound, env)?;
        if result.is_abrupt() {
            frame.discard();
            return Ok(result);
        }
        let deps = frame.finish();

        if !owner.ptr_eq(env) {
            let shadow = Signal::new();
            for dep in &deps {
                shadow.observe(dep);
            }
            install_rebind_handler(self.name(name), name, &shadow, env);
            tracing::debug!(name = self.name(name), deps = deps.len(), "assign shadows outer");

            env.set(name, Binding::new(bound, shadow));
            current.signal.notify(None, &self.ctx.trace_ids)?;
            return Ok(Value::Null);
        }

        let signal = current.signal;
        signal.clear_sources();
        for dep in deps.iter().filter(|dep| !dep.ptr_eq(&signal)) {
            signal.observe(dep);
        }
        tracing::debug!(name = self.name(name), deps = deps.len(), "assign");

        env.set(name, Binding::new(bound, signal.clone()));
        signal.notify(None, &self.ctx.trace_ids)?;
        Ok(Value::Null)
    }

    /// `source ~> handler`
    ///
    /// Every change to `source` calls `handler(source)`. The subscription's
    /// signal belongs to the current scope and dies with it.
    pub(super) fn eval_subscribe(
        &self,
        source: Name,
        handler: Name,
        env: &Environment,
    ) -> EvalResult {
        let Some(binding) = env.get(source) else {
            return Ok(unknown_identifier(self.name(source)));
        };
        if env.get(handler).is_none() && !self.ctx.natives.contains(handler) {
            return Ok(unknown_handler(self.name(handler)));
        }

        let subscription = Signal::new();
        subscription.observe(&binding.signal);
        let ctx = Rc::downgrade(&self.ctx);
        let scope = env.downgrade();
        subscription.set_handler(move |id| {
            let (Some(ctx), Some(scope)) = (ctx.upgrade(), scope.upgrade()) else {
                return Ok(());
            };
            Interpreter::from_context(ctx).run_subscription(source, handler, &scope, id)
        });
        tracing::debug!(
            source = self.name(source),
            handler = self.name(handler),
            "subscribe"
        );

        env.add_subscription(subscription);
        Ok(Value::Null)
    }

    /// Call `handler(source)` in `env` for one notification.
    ///
    /// The call does not count as a dependency of whatever binding is being
    /// evaluated when the notification fires. An `Error` result is logged,
    /// not propagated: the assignment that triggered it already succeeded.
    fn run_subscription(
        &self,
        source: Name,
        handler: Name,
        env: &Environment,
        id: TraceId,
    ) -> Result<(), EvalFault> {
        let call = Expr::new(
            ExprKind::Call {
                callee: Expr::ident(handler, Span::DUMMY),
                args: vec![Expr::ident(source, Span::DUMMY)],
            },
            Span::DUMMY,
        );
        let frame = self.ctx.deps.frame();
        let result = self.eval_expr(&call, env);
        frame.discard();

        if let Value::Error(err) = result? {
            tracing::warn!(
                trace = id.raw(),
                source = self.name(source),
                handler = self.name(handler),
                error = %err,
                "subscription handler failed"
            );
        }
        Ok(())
    }
}

/// On notification, forward to the signal now bound to `name` if the
/// binding has since been replaced by a new `let`.
fn install_rebind_handler(label: &'static str, name: Name, signal: &Signal, env: &Environment) {
    let scope = env.downgrade();
    let me = signal.downgrade();
    signal.set_handler(move |id| {
        let Some(latest) = scope.upgrade().and_then(|scope| scope.get_local(name)) else {
            return Err(EvalFault::BindingRemoved {
                name: label.to_string(),
            });
        };
        match me.upgrade() {
            Some(me) if me.ptr_eq(&latest.signal) => Ok(()),
            _ => {
                tracing::trace!(name = label, trace = id.raw(), "forwarding to rebound signal");
                latest.signal.propagate(id)
            }
        }
    });
}
