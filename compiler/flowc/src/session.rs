//! One interpreter kept alive across evaluations.

use flow_eval::{Interpreter, InterpreterBuilder, SharedOutput, Value};
use flow_ir::SharedInterner;

use crate::options::Options;
use crate::report::render_parse_error;

/// What evaluating a piece of source produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A non-`NULL` result, already inspected.
    Value(String),
    /// The result was `NULL`.
    Nothing,
    /// The program produced an `Error` value.
    Error(String),
    /// Evaluation aborted.
    Fault(String),
    /// The source did not lex or parse; holds the rendered report.
    Syntax(String),
}

impl Outcome {
    /// Process exit code for `flow run`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Value(_) | Outcome::Nothing => 0,
            Outcome::Error(_) | Outcome::Syntax(_) => 1,
            Outcome::Fault(_) => 2,
        }
    }
}

/// An interner plus a persistent interpreter.
///
/// Bindings made by one [`eval_source`](Self::eval_source) call stay live
/// for the next, along with their subscriptions.
pub struct Session {
    interner: SharedInterner,
    interp: Interpreter,
}

impl Session {
    /// A session printing to stdout.
    pub fn new(options: &Options) -> Self {
        Self::build(options, None)
    }

    /// A session printing to `output`.
    pub fn with_output(options: &Options, output: SharedOutput) -> Self {
        Self::build(options, Some(output))
    }

    fn build(options: &Options, output: Option<SharedOutput>) -> Self {
        let interner = SharedInterner::new();
        let mut builder = InterpreterBuilder::new(&interner).max_depth(options.max_depth);
        if let Some(output) = output {
            builder = builder.output(output);
        }
        Session {
            interp: builder.build(),
            interner,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Parse and evaluate `source`. `path` labels syntax error reports.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn eval_source(&self, path: &str, source: &str) -> Outcome {
        let program = match flow_parse::parse_source(source, &self.interner) {
            Ok(program) => program,
            Err(err) => {
                tracing::debug!(%err, "syntax error");
                return Outcome::Syntax(render_parse_error(path, source, &err));
            }
        };

        match self.interp.eval_program(&program) {
            Ok(Value::Null) => Outcome::Nothing,
            Ok(Value::Error(err)) => Outcome::Error(err.message()),
            Ok(value) => Outcome::Value(self.interp.inspect(&value)),
            Err(fault) => Outcome::Fault(fault.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_eval::capture_output;
    use pretty_assertions::assert_eq;

    fn session() -> (Session, SharedOutput) {
        let output = capture_output();
        let session = Session::with_output(&Options::default(), output.clone());
        (session, output)
    }

    #[test]
    fn test_outcomes() {
        let (session, _) = session();
        assert_eq!(
            session.eval_source("t", "1 + 2"),
            Outcome::Value("3".to_string())
        );
        assert_eq!(session.eval_source("t", "let a = 1;"), Outcome::Nothing);
        assert_eq!(
            session.eval_source("t", "-true"),
            Outcome::Error("unknown operator: -BOOLEAN".to_string())
        );
        assert_eq!(
            session.eval_source("t", "1 / 0"),
            Outcome::Fault("division by zero".to_string())
        );
        assert!(matches!(session.eval_source("t", "let = 1;"), Outcome::Syntax(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Value("1".to_string()).exit_code(), 0);
        assert_eq!(Outcome::Nothing.exit_code(), 0);
        assert_eq!(Outcome::Error(String::new()).exit_code(), 1);
        assert_eq!(Outcome::Syntax(String::new()).exit_code(), 1);
        assert_eq!(Outcome::Fault(String::new()).exit_code(), 2);
    }

    #[test]
    fn test_bindings_persist_between_sources() {
        let (session, output) = session();
        assert_eq!(session.eval_source("t", "let a = 1; let b = a * 10;"), Outcome::Nothing);
        assert_eq!(session.eval_source("t", "b ~> print;"), Outcome::Nothing);
        assert_eq!(session.eval_source("t", "a = 4;"), Outcome::Nothing);
        assert_eq!(
            session.eval_source("t", "b"),
            Outcome::Value("40".to_string())
        );
        assert_eq!(output.captured(), "40\n");
    }

    #[test]
    fn test_max_depth_option() {
        let options = Options { max_depth: 16 };
        let session = Session::with_output(&options, capture_output());
        let outcome = session.eval_source(
            "t",
            "let f = (n) => { n == 0 ? 0 : f(n - 1) }; f(100)",
        );
        assert_eq!(
            outcome,
            Outcome::Fault("maximum recursion depth exceeded (16)".to_string())
        );
        assert_eq!(
            session.eval_source("t", "f(3)"),
            Outcome::Value("0".to_string())
        );
    }
}
