//! Function literals, calls, closures and recursion.

use pretty_assertions::assert_eq;

use super::{eval, eval_error, Session};
use crate::{EvalFault, Value};

#[test]
fn test_function_literal_value() {
    let session = Session::new();
    let value = session.eval("(x) => { x + 2; };");
    let Value::Function(func) = &value else {
        panic!("expected a function, got {value:?}");
    };
    assert_eq!(func.params.len(), 1);
    assert_eq!(session.inspect(&value), "(x) => { (x + 2) }");
}

#[test]
fn test_function_application() {
    let cases = [
        ("let identity = (x) => { x; }; identity(5);", 5),
        ("let identity = (x) => { return x; }; identity(5);", 5),
        ("let add = (x, y) => { return x + y; }; add(7, 9);", 16),
        ("let add = (x, y) => { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("(x) => { x; }(5);", 5),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::int(expected), "{source}");
    }
    assert_eq!(
        eval(r#"let identity = (x) => { return x; }; identity("test");"#),
        Value::string("test")
    );
}

#[test]
fn test_return_statements() {
    let cases = [
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", 10),
        ("let f = (x) => { if (x > 0) { return 1; } return -1; }; f(3) + f(-3);", 0),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::int(expected), "{source}");
    }
}

#[test]
fn test_empty_body_is_null() {
    assert_eq!(eval("let f = () => { }; f();"), Value::Null);
}

#[test]
fn test_closures_capture_definition_scope() {
    let source = "
        let adder = (x) => { (y) => { x + y } };
        let add2 = adder(2);
        add2(3);
    ";
    assert_eq!(eval(source), Value::int(5));
}

#[test]
fn test_higher_order_functions() {
    let source = "
        let apply = (f, v) => { f(v) };
        let double = (x) => { x * 2 };
        apply(double, 21);
    ";
    assert_eq!(eval(source), Value::int(42));
}

#[test]
fn test_function_argument_closes_over_caller_scope() {
    let source = "
        let k = 10;
        let call = (f) => { let k = 1; f(5) };
        call((x) => { x * k });
    ";
    assert_eq!(eval(source), Value::int(50));
}

#[test]
fn test_parameter_shadows_global() {
    assert_eq!(
        eval("let x = 100; let f = (x) => { x + 1 }; f(1) + x;"),
        Value::int(102)
    );
}

#[test]
fn test_locals_inside_function() {
    assert_eq!(
        eval("let f = (a) => { let b = a * 2; let c = b + 1; c }; f(4);"),
        Value::int(9)
    );
}

#[test]
fn test_recursion() {
    let source = "
        let fact = (n) => { if (n < 2) { return 1; } n * fact(n - 1) };
        fact(10);
    ";
    assert_eq!(eval(source), Value::int(3_628_800));

    let fib = "
        let fib = (n) => { n < 2 ? n : fib(n - 1) + fib(n - 2) };
        fib(12);
    ";
    assert_eq!(eval(fib), Value::int(144));
}

#[test]
fn test_recursion_limit_is_fault() {
    let session = Session::with_builder(|b| b.max_depth(64));
    let result = session.run("let f = (n) => { f(n + 1) }; f(0);");
    assert_eq!(result, Err(EvalFault::RecursionLimit { depth: 64 }));
    // The interpreter is usable afterwards.
    assert_eq!(session.eval("let g = (n) => { n }; g(1);"), Value::int(1));
}

#[test]
fn test_call_errors() {
    let cases = [
        ("5(1)", "not a function: INTEGER"),
        ("let f = (a, b) => { a }; f(1);", "wrong number of arguments: want=2, got=1"),
        ("let f = () => { 1 }; f(1, 2);", "wrong number of arguments: want=0, got=2"),
        ("let f = (a) => { a + true }; f(1);", "type mismatch: INTEGER + BOOLEAN"),
        ("missing(1)", "identifier not found: missing"),
        ("len(nothing)", "identifier not found: nothing"),
    ];
    for (source, expected) in cases {
        assert_eq!(eval_error(source), expected, "{source}");
    }
}

#[test]
fn test_ternary() {
    assert_eq!(eval("1 < 2 ? 10 : 20"), Value::int(10));
    assert_eq!(eval("1 > 2 ? 10 : 20"), Value::int(20));
    assert_eq!(eval("false ? 1 : true ? 2 : 3"), Value::int(2));
}

#[test]
fn test_if_else() {
    assert_eq!(eval("if (true) { 10 }"), Value::int(10));
    assert_eq!(eval("if (false) { 10 }"), Value::Null);
    assert_eq!(eval("if (1) { 10 }"), Value::int(10));
    assert_eq!(eval("if (1 > 2) { 10 } else { 20 }"), Value::int(20));
    assert_eq!(eval("if (1 > 2) { 10 } else if (2 > 1) { 30 } else { 20 }"), Value::int(30));
}

#[test]
fn test_if_blocks_share_scope() {
    assert_eq!(eval("if (true) { let inner = 3; } inner;"), Value::int(3));
}

#[test]
fn test_natives_are_shadowable() {
    assert_eq!(eval("let len = (x) => { 99 }; len([1]);"), Value::int(99));
}

#[test]
fn test_custom_native() {
    fn answer(_: &crate::NativeCtx<'_>, _: &[Value]) -> Value {
        Value::int(42)
    }
    let session = Session::with_builder(|b| b.native("answer", answer));
    assert_eq!(session.eval("answer() + 0"), Value::int(42));
    assert_eq!(session.inspect(&session.eval("answer")), "native function");
}
