//! Binary operator semantics.
//!
//! Integers get arithmetic and comparison. Any other pair of operands only
//! supports `==`/`!=`, and only when both have the same type.

use flow_ir::BinaryOp;

use crate::errors::{type_mismatch, unknown_operator, EvalFault, EvalResult};
use crate::value::Value;

/// Apply `op` to two evaluated operands.
///
/// Arithmetic wraps on overflow. Division truncates toward zero; dividing by
/// zero is a fault.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        _ if std::mem::discriminant(left) != std::mem::discriminant(right) => {
            Ok(type_mismatch(left, op, right))
        }
        _ => match op {
            BinaryOp::Eq => Ok(Value::Bool(same_value(left, right))),
            BinaryOp::NotEq => Ok(Value::Bool(!same_value(left, right))),
            _ => Ok(unknown_operator(left, op, right)),
        },
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    let value = match op {
        BinaryOp::Add => Value::int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::int(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                return Err(EvalFault::DivisionByZero);
            }
            Value::int(a.wrapping_div(b))
        }
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Assign => unknown_operator(&Value::int(a), op, &Value::int(b)),
    };
    Ok(value)
}

/// Equality for `==` on same-typed non-integers.
///
/// Scalars and strings compare by value; arrays and functions by identity.
fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => std::rc::Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => std::rc::Rc::ptr_eq(a, b),
        (Value::Native(a), Value::Native(b)) => a.name == b.name,
        _ => false,
    }
}
