//! Command handlers for the `flow` binary.
//!
//! Each submodule implements one command. Shared helpers live here.

mod debug;
mod repl;
mod run;

pub use debug::{lex_file, parse_file};
pub use repl::{run_repl, Repl, PROMPT};
pub use run::run_file;

/// Read a source file, describing the failure on error.
pub(crate) fn read_source(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {e}"),
    })
}

/// Read a source file or exit with status 1.
pub(crate) fn read_file(path: &str) -> String {
    match read_source(path) {
        Ok(content) => content,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
