//! Prefix operator semantics.

use flow_ir::UnaryOp;

use crate::errors::unknown_prefix_operator;
use crate::value::Value;

/// `!x` negates truthiness and accepts anything; `-x` needs an integer.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Neg => match operand {
            Value::Int(n) => Value::int(n.wrapping_neg()),
            other => unknown_prefix_operator(op.as_symbol(), other),
        },
    }
}
