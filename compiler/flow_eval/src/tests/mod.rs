//! Evaluator tests, driven through the parser.

mod collection_tests;
mod function_tests;
mod operators_tests;

use std::rc::Rc;

use flow_ir::{Expr, SharedInterner, StmtKind};
use flow_parse::parse_source;

use crate::{
    capture_output, EvalFault, Interpreter, InterpreterBuilder, SharedOutput, Value,
};

/// An interpreter capturing its output, kept across several programs.
pub(crate) struct Session {
    pub(crate) interp: Interpreter,
    output: SharedOutput,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self::with_builder(|b| b)
    }

    pub(crate) fn with_builder(
        configure: impl FnOnce(InterpreterBuilder) -> InterpreterBuilder,
    ) -> Self {
        let interner = SharedInterner::new();
        let output = capture_output();
        let builder = InterpreterBuilder::new(&interner).output(output.clone());
        Session {
            interp: configure(builder).build(),
            output,
        }
    }

    pub(crate) fn run(&self, source: &str) -> Result<Value, EvalFault> {
        let program = match parse_source(source, self.interp.interner()) {
            Ok(program) => program,
            Err(err) => panic!("parse error in {source:?}: {err}"),
        };
        self.interp.eval_program(&program)
    }

    pub(crate) fn eval(&self, source: &str) -> Value {
        match self.run(source) {
            Ok(value) => value,
            Err(fault) => panic!("fault in {source:?}: {fault}"),
        }
    }

    pub(crate) fn output(&self) -> String {
        self.output.captured()
    }

    /// Output since the last call.
    pub(crate) fn take_output(&self) -> String {
        self.output.take()
    }

    pub(crate) fn inspect(&self, value: &Value) -> String {
        self.interp.inspect(value)
    }
}

pub(crate) fn eval(source: &str) -> Value {
    Session::new().eval(source)
}

/// Evaluate and return the message of the resulting `Error` value.
pub(crate) fn eval_error(source: &str) -> String {
    match eval(source) {
        Value::Error(err) => err.message(),
        other => panic!("expected an error from {source:?}, got {other:?}"),
    }
}

/// Parse a single expression statement.
pub(crate) fn parse_expr(source: &str, interner: &SharedInterner) -> Rc<Expr> {
    let program = match parse_source(source, interner) {
        Ok(program) => program,
        Err(err) => panic!("parse error in {source:?}: {err}"),
    };
    match program.stmts.first().map(|stmt| &stmt.kind) {
        Some(StmtKind::Expr(expr)) => Rc::clone(expr),
        other => panic!("expected an expression statement, got {other:?}"),
    }
}
