//! The `run` command: evaluate a Flow source file.

use super::read_file;
use crate::options::Options;
use crate::session::{Outcome, Session};

/// Evaluate the file at `path` and exit with its outcome's status.
///
/// A non-`NULL` result is printed to stdout. Syntax errors, `Error` values
/// and faults go to stderr.
pub fn run_file(path: &str, options: &Options) {
    let source = read_file(path);
    let session = Session::new(options);
    let outcome = session.eval_source(path, &source);

    match &outcome {
        Outcome::Value(text) => println!("{text}"),
        Outcome::Nothing => {}
        Outcome::Error(msg) => eprintln!("ERROR: {msg}"),
        Outcome::Fault(msg) => eprintln!("fatal: {msg}"),
        Outcome::Syntax(report) => eprint!("{report}"),
    }

    let code = outcome.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
}
