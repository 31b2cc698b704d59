//! The `repl` command: read-eval-print loop over one persistent session.

use std::io::{self, BufRead, Write};

use super::read_source;
use crate::options::Options;
use crate::session::{Outcome, Session};

pub const PROMPT: &str = ">> ";

/// Line-by-line evaluator.
///
/// A line ending in `.flow` is taken as a path: the file is read and
/// evaluated in the same session, so its bindings stay available.
pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new(session: Session) -> Self {
        Repl { session }
    }

    /// Evaluate one line and return what to show for it, if anything.
    pub fn eval_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let outcome = if line.ends_with(".flow") {
            match read_source(line) {
                Ok(source) => self.session.eval_source(line, &source),
                Err(msg) => return Some(msg),
            }
        } else {
            self.session.eval_source("<repl>", line)
        };

        match outcome {
            Outcome::Value(text) => Some(text),
            Outcome::Nothing => None,
            Outcome::Error(msg) => Some(format!("ERROR: {msg}")),
            Outcome::Fault(msg) => Some(format!("fatal: {msg}")),
            Outcome::Syntax(report) => Some(report.trim_end().to_string()),
        }
    }

    /// Prompt on `out`, read lines from `input` until it is exhausted.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut out: W) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                return Ok(());
            };
            if let Some(text) = self.eval_line(&line?) {
                writeln!(out, "{text}")?;
            }
        }
    }
}

/// Run the REPL on stdin and stdout.
pub fn run_repl(options: &Options) {
    println!("Flow {}", env!("CARGO_PKG_VERSION"));
    let repl = Repl::new(Session::new(options));
    if let Err(e) = repl.run(io::stdin().lock(), io::stdout()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
