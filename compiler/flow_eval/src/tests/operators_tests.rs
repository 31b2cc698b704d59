//! Arithmetic, comparison, prefix operators and the error messages they
//! produce.

use flow_ir::{BinaryOp, UnaryOp};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{eval, eval_error, Session};
use crate::{evaluate_binary, evaluate_unary, EvalFault, Value};

#[test]
fn test_integer_expressions() {
    let cases = [
        ("5", 5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("-7 / 2", -3),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::int(expected), "{source}");
    }
}

#[test]
fn test_boolean_expressions() {
    let cases = [
        ("true", true),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("true == true", true),
        ("true == false", false),
        ("false != true", true),
        ("(1 < 2) == true", true),
        ("(1 > 2) == true", false),
        (r#""a" == "a""#, true),
        (r#""a" != "b""#, true),
        (r#"let s = "a"; "${s}" == "a""#, true),
        ("if (false) { 1 } == if (false) { 2 }", true),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::Bool(expected), "{source}");
    }
}

#[test]
fn test_bang_operator() {
    let cases = [
        ("!true", false),
        ("!5", false),
        ("!0", false),
        ("!!true", true),
        ("!!false", false),
        ("!if (false) { 1 }", true),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::Bool(expected), "{source}");
    }
}

#[test]
fn test_arrays_compare_by_identity() {
    assert_eq!(eval("[1] == [1]"), Value::Bool(false));
    assert_eq!(eval("let xs = [1]; xs == xs"), Value::Bool(true));
}

#[test]
fn test_error_messages() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("true == 1", "type mismatch: BOOLEAN == INTEGER"),
        ("-true;", "unknown operator: -BOOLEAN"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5;", "unknown operator: BOOLEAN + BOOLEAN"),
        (r#""a" + "b""#, "unknown operator: STRING + STRING"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        ("foobar", "identifier not found: foobar"),
        ("let a = a;", "identifier not found: a"),
        ("7 = 9;", "invalid assignment target: 7"),
        ("1 + -true", "unknown operator: -BOOLEAN"),
    ];
    for (source, expected) in cases {
        assert_eq!(eval_error(source), expected, "{source}");
    }
}

#[test]
fn test_division_by_zero_is_fault() {
    let session = Session::new();
    assert_eq!(session.run("1 / 0"), Err(EvalFault::DivisionByZero));
    assert_eq!(session.run("let z = 0; 10 / z"), Err(EvalFault::DivisionByZero));
}

#[test]
fn test_evaluate_binary_direct() {
    assert_eq!(
        evaluate_binary(&Value::int(7), &Value::int(2), BinaryOp::Sub),
        Ok(Value::int(5))
    );
    assert_eq!(
        evaluate_binary(&Value::int(i64::MAX), &Value::int(1), BinaryOp::Add),
        Ok(Value::int(i64::MIN))
    );
    assert_eq!(
        evaluate_binary(&Value::int(i64::MIN), &Value::int(-1), BinaryOp::Div),
        Ok(Value::int(i64::MIN))
    );
    assert_eq!(
        evaluate_binary(&Value::Null, &Value::Null, BinaryOp::Eq),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_evaluate_unary_direct() {
    assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::int(3)), Value::int(-3));
    assert_eq!(evaluate_unary(UnaryOp::Not, &Value::Null), Value::Bool(true));
    assert!(evaluate_unary(UnaryOp::Neg, &Value::string("x")).is_error());
}

proptest! {
    #[test]
    fn division_truncates_like_host(
        x in -1_000_000_000_000i64..1_000_000_000_000,
        y in (-1_000_000i64..1_000_000).prop_filter("non-zero", |y| *y != 0),
    ) {
        prop_assert_eq!(eval(&format!("{x} / {y}")), Value::int(x / y));
    }

    #[test]
    fn division_by_zero_always_faults(x in -1_000_000i64..1_000_000) {
        let session = Session::new();
        prop_assert_eq!(session.run(&format!("{x} / 0")), Err(EvalFault::DivisionByZero));
    }

    #[test]
    fn comparison_matches_host(x in -1000i64..1000, y in -1000i64..1000) {
        prop_assert_eq!(eval(&format!("{x} < {y}")), Value::Bool(x < y));
        prop_assert_eq!(eval(&format!("{x} == {y}")), Value::Bool(x == y));
    }
}
