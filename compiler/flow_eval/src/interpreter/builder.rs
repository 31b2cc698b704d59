//! `InterpreterBuilder` for configuring an [`Interpreter`].

use std::rc::Rc;

use flow_ir::SharedInterner;

use super::{EvalContext, Interpreter};
use crate::call_stack::{CallStack, DEFAULT_MAX_DEPTH};
use crate::dependencies::Dependencies;
use crate::environment::Environment;
use crate::natives::{NativeFn, NativeRegistry};
use crate::output::{stdout_output, SharedOutput};
use crate::signal::TraceIds;

/// Builder for [`Interpreter`].
///
/// Defaults: builtins `len` and `print`, output to stdout, call depth
/// limited to [`DEFAULT_MAX_DEPTH`].
pub struct InterpreterBuilder {
    interner: SharedInterner,
    natives: NativeRegistry,
    output: Option<SharedOutput>,
    max_depth: usize,
}

impl InterpreterBuilder {
    pub fn new(interner: &SharedInterner) -> Self {
        InterpreterBuilder {
            natives: NativeRegistry::with_builtins(interner),
            interner: interner.clone(),
            output: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Where `print` writes.
    #[must_use]
    pub fn output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Maximum depth of nested user-function calls.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Register an extra native, or replace a builtin.
    #[must_use]
    pub fn native(mut self, name: &'static str, func: NativeFn) -> Self {
        self.natives.register(&self.interner, name, func);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter::from_context(Rc::new(EvalContext {
            interner: self.interner,
            natives: self.natives,
            output: self.output.unwrap_or_else(stdout_output),
            trace_ids: TraceIds::new(),
            call_stack: CallStack::new(self.max_depth),
            deps: Dependencies::new(),
            global: Environment::new(),
        }))
    }
}
