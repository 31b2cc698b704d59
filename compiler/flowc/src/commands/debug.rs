//! Debug commands: `lex` and `parse` for inspecting the front end.

use flow_ir::{AstPrinter, SharedInterner};

use super::read_file;
use crate::report::render_parse_error;

/// Lex a file and print the token stream.
pub fn lex_file(path: &str) {
    let source = read_file(path);
    let interner = SharedInterner::new();

    match flow_lexer::lex(&source, &interner) {
        Ok(tokens) => {
            println!("Tokens for '{}' ({} tokens):", path, tokens.len());
            for tok in &tokens {
                println!("  {tok:?}");
            }
        }
        Err(err) => {
            eprint!("{}", render_parse_error(path, &source, &err.into()));
            std::process::exit(1);
        }
    }
}

/// Parse a file and print the program back as source text.
pub fn parse_file(path: &str) {
    let source = read_file(path);
    let interner = SharedInterner::new();

    match flow_parse::parse_source(&source, &interner) {
        Ok(program) => {
            println!("Parse result for '{path}' ({} statements):", program.stmts.len());
            print!("{}", AstPrinter::new(&interner).program_to_string(&program));
        }
        Err(err) => {
            eprint!("{}", render_parse_error(path, &source, &err));
            std::process::exit(1);
        }
    }
}
