//! Parser tests, grouped by construct.

mod stmt_tests;

use flow_ir::{AstPrinter, Program, StringInterner};

use crate::{parse_source, ParseError};

/// Parse `source` and render each statement back to text.
fn render(source: &str) -> Vec<String> {
    let interner = StringInterner::new();
    let program = match parse_source(source, &interner) {
        Ok(program) => program,
        Err(e) => panic!("parse of {source:?} failed: {e}"),
    };
    let printer = AstPrinter::new(&interner);
    printer
        .program_to_string(&program)
        .lines()
        .map(str::to_owned)
        .collect()
}

fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    match parse_source(source, &interner) {
        Ok(program) => panic!("expected error for {source:?}, got {program:?}"),
        Err(e) => e,
    }
}

fn parse_ok(source: &str, interner: &StringInterner) -> Program {
    match parse_source(source, interner) {
        Ok(program) => program,
        Err(e) => panic!("parse of {source:?} failed: {e}"),
    }
}
