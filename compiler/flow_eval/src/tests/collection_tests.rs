//! Strings, arrays, indexing, slicing and the builtins that work on them.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{eval, eval_error, Session};
use crate::{EvalFault, Value};

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::int).collect())
}

#[test]
fn test_string_template() {
    assert_eq!(eval(r#""foo ${1 + 7 * 9} bar";"#), Value::string("foo 64 bar"));
    assert_eq!(
        eval(r#"let name = "flow"; let n = 2; "${name} x${n}: ${n > 1} ${if (false) { 1 }}""#),
        Value::string("flow x2: true NULL")
    );
}

#[test]
fn test_template_with_nested_literal() {
    assert_eq!(eval(r#""a${ "x${2}" }b""#), Value::string("ax2b"));
    assert_eq!(
        eval(r#"let n = 3; "[${ n > 2 ? "big" : "small" }]""#),
        Value::string("[big]")
    );
}

#[test]
fn test_template_is_reactive() {
    let session = Session::new();
    session.eval(r#"let n = 1; let msg = "n=${n}"; msg ~> print; n = 2;"#);
    assert_eq!(session.output(), "n=2\n");
}

#[test]
fn test_template_rejects_arrays() {
    let session = Session::new();
    assert_eq!(
        session.run(r#""${[1, 2]}""#),
        Err(EvalFault::Unstringifiable { type_name: "ARRAY" })
    );
}

#[test]
fn test_template_propagates_errors() {
    assert_eq!(eval_error(r#""a ${1 + true}""#), "type mismatch: INTEGER + BOOLEAN");
}

#[test]
fn test_array_literal() {
    assert_eq!(eval("[1, 2 * 2, 3 + 3]"), ints(&[1, 4, 6]));
    assert_eq!(eval("[]"), ints(&[]));
    let session = Session::new();
    let nested = session.eval(r#"[1, [true, "x"], if (false) { 1 }]"#);
    assert_eq!(session.inspect(&nested), "[1, [true, x], NULL]");
}

#[test]
fn test_array_indexing() {
    let cases = [
        ("[1, 2, 3][0]", Value::int(1)),
        ("[1, 2, 3][1 + 1]", Value::int(3)),
        ("let i = 0; [1][i];", Value::int(1)),
        ("let myArray = [1, 2, 3]; myArray[2];", Value::int(3)),
        ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", Value::int(2)),
        ("[1, 2, 3][3]", Value::Null),
        ("[1, 2, 3][5]", Value::Null),
        ("[1, 2, 3][-1]", Value::Null),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), expected, "{source}");
    }
}

#[test]
fn test_array_slicing() {
    let cases = [
        ("[1, 2, 3][:]", vec![1, 2, 3]),
        ("[1, 2, 3][1:]", vec![2, 3]),
        ("[1, 2, 3][:2]", vec![1, 2]),
        ("[1, 2, 3][1:2]", vec![2]),
        ("[1, 2, 3][2:1]", vec![]),
        ("[1, 2, 3][-5:10]", vec![1, 2, 3]),
        ("let i = 0; let j = 2; [1, 2, 3][i:j];", vec![1, 2]),
        (
            "let xs = [1, 2, 3]; let lower = 1 + 0; let upper = 1 + 1; xs[lower:upper];",
            vec![2],
        ),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), ints(&expected), "{source}");
    }
}

#[test]
fn test_slice_binding_follows_source() {
    // `ys` is bound to the expression `xs[:]`, not to a copy.
    assert_eq!(
        eval("let xs = [1, 2, 3]; let ys = xs[:]; xs = [7]; ys[0];"),
        Value::int(7)
    );
}

#[test]
fn test_index_errors() {
    let cases = [
        ("1[0]", "index operator not supported: INTEGER"),
        (r#""abc"[0]"#, "index operator not supported: STRING"),
        ("[1][true]", "index must be INTEGER, got=BOOLEAN"),
        ("[1][true:]", "slice bound must be INTEGER, got=BOOLEAN"),
        ("[1][:[1]]", "slice bound must be INTEGER, got=ARRAY"),
        ("5[1:2]", "index operator not supported: INTEGER"),
        ("[1, 2 + true][0]", "type mismatch: INTEGER + BOOLEAN"),
    ];
    for (source, expected) in cases {
        assert_eq!(eval_error(source), expected, "{source}");
    }
}

#[test]
fn test_len() {
    let cases = [
        (r#"len("")"#, 0),
        (r#"len("four")"#, 4),
        (r#"len("hello world")"#, 11),
        ("len([1, 2, 3])", 3),
        ("len([1, 2, 3][1:])", 2),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::int(expected), "{source}");
    }
    assert_eq!(
        eval_error("len(1)"),
        r#"argument to "len" not supported, got=INTEGER"#
    );
    assert_eq!(
        eval_error(r#"len("one", "two")"#),
        "expected 1 argument for len got=2"
    );
}

#[test]
fn test_print_output() {
    let session = Session::new();
    let result = session.eval(r#"print(1, "two", [3], true); print();"#);
    assert_eq!(result, Value::Null);
    assert_eq!(session.output(), "1\ntwo\n[3]\ntrue\n");
}

#[test]
fn test_recursive_sum_over_slices() {
    let source = "
        let sum = (arr) => {
            if (len(arr) == 0) { return 0; }
            arr[0] + sum(arr[1:])
        };
        sum([1, 2, 3]);
    ";
    assert_eq!(eval(source), Value::int(6));
}

#[test]
fn test_map_with_accumulator() {
    let source = "
        let map = (arr, f, acc) => {
            if (len(arr) == 0) { return acc; }
            map(arr[1:], f, acc + f(arr[0]))
        };
        map([1, 2, 3, 4], (x) => { x * x }, 0);
    ";
    assert_eq!(eval(source), Value::int(30));
}

fn array_source(items: &[i64]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

proptest! {
    #[test]
    fn full_slice_is_equal(items in proptest::collection::vec(-100i64..100, 0..8)) {
        let source = format!("{}[:]", array_source(&items));
        prop_assert_eq!(eval(&source), ints(&items));
    }

    #[test]
    fn slice_length_is_clamped(
        items in proptest::collection::vec(0i64..10, 0..8),
        lower in -4i64..12,
        upper in -4i64..12,
    ) {
        let source = format!("len({}[{lower}:{upper}])", array_source(&items));
        let n = i64::try_from(items.len()).unwrap_or(i64::MAX);
        let expected = (upper.min(n) - lower.max(0)).max(0);
        prop_assert_eq!(eval(&source), Value::int(expected));
    }
}
