use flow_ir::{ExprKind, Span, StmtKind, StringInterner};
use pretty_assertions::assert_eq;

use super::{parse_err, parse_ok, render};

#[test]
fn test_let_statements() {
    let interner = StringInterner::new();
    let program = parse_ok("let x = 5; let y = true; let foobar = y;", &interner);
    let names: Vec<&str> = program
        .stmts
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Let { name, .. } => interner.lookup(*name),
            other => panic!("expected let, got {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["x", "y", "foobar"]);
}

#[test]
fn test_return_statements() {
    assert_eq!(
        render("return 5; return 10; return add(1, 2);"),
        vec!["return 5;", "return 10;", "return add(1, 2);"]
    );
}

#[test]
fn test_semicolons_are_optional() {
    assert_eq!(render("let a = 1\na"), vec!["let a = 1;", "a"]);
    assert_eq!(
        render("let f = (x) => { let y = x return y }"),
        vec!["let f = (x) => { let y = x; return y; };"]
    );
}

#[test]
fn test_statement_spans() {
    let interner = StringInterner::new();
    let program = parse_ok("let a = 12;\nb", &interner);
    assert_eq!(program.stmts[0].span, Span::new(0, 11));
    assert_eq!(program.stmts[1].span, Span::new(12, 13));
    let StmtKind::Let { value, .. } = &program.stmts[0].kind else {
        panic!("expected let");
    };
    assert_eq!(value.kind, ExprKind::Int(12));
    assert_eq!(value.span, Span::new(8, 10));
}

#[test]
fn test_empty_program() {
    let interner = StringInterner::new();
    assert!(parse_ok("  // nothing here\n", &interner).stmts.is_empty());
}

#[test]
fn test_unclosed_block() {
    assert_eq!(
        parse_err("if (x) { 1").message,
        "expected `}`, found end of input"
    );
}
