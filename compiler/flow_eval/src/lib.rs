//! Reactive evaluator for Flow.
//!
//! `let` does not store a value. It stores the bound expression together with
//! a [`Signal`], and records which other bindings the expression read while it
//! was first evaluated. Reassigning a binding notifies its signal, and the
//! notification walks every dependent signal once per change, re-running the
//! subscriptions (`source ~> handler`) attached along the way.
//!
//! # Architecture
//!
//! - [`Value`]: runtime values
//! - [`Signal`]: observer graph node with trace-id deduplication
//! - [`Environment`]: scope chain of observable bindings
//! - reference substitution: free identifiers to bound expressions
//! - [`Interpreter`]: tree-walking evaluator driving all of the above
//!
//! Two error tiers exist. User mistakes such as a type mismatch are
//! [`Value::Error`] results that short-circuit like `return`. Division by
//! zero and resource exhaustion are [`EvalFault`]s that abort evaluation.

mod call_stack;
mod dependencies;
mod environment;
mod errors;
mod interpreter;
mod natives;
mod operators;
mod output;
mod signal;
mod substitute;
mod unary_operators;
mod value;

pub use call_stack::{CallGuard, CallStack, DEFAULT_MAX_DEPTH};
pub use environment::{Binding, Environment, LocalScope, WeakEnvironment};
pub use errors::{ErrorKind, EvalError, EvalFault, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use natives::{NativeCtx, NativeFn, NativeRegistry};
pub use operators::evaluate_binary;
pub use output::{
    capture_output, discard_output, stdout_output, Capture, Output, SharedOutput,
};
pub use signal::{Signal, TraceId, TraceIds, WeakSignal};
pub use unary_operators::evaluate_unary;
pub use value::{FunctionValue, NativeFunction, Value, ValueDisplay};

#[cfg(test)]
mod tests;
