//! Error types for evaluation.
//!
//! Two tiers:
//!
//! - [`EvalError`] is a user-program mistake. It travels as a
//!   [`Value::Error`](crate::Value::Error), short-circuits blocks and calls
//!   like `return`, and becomes the program's result.
//! - [`EvalFault`] is a broken invariant or exhausted resource. It aborts the
//!   whole evaluation through `Result::Err`.
//!
//! Factory functions (e.g. [`type_mismatch`]) are the way to build errors; the
//! `Display` impl of [`ErrorKind`] produces the user-facing message.

use std::fmt;

use flow_ir::BinaryOp;

use crate::value::Value;

/// Result of evaluating one node.
pub type EvalResult = Result<Value, EvalFault>;

/// Typed category of a recoverable error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operands of a binary operator have different types.
    TypeMismatch {
        left: &'static str,
        op: BinaryOp,
        right: &'static str,
    },
    /// Same-typed operands the operator does not support.
    UnknownOperator {
        left: &'static str,
        op: BinaryOp,
        right: &'static str,
    },
    /// Prefix operator applied to an unsupported operand.
    UnknownPrefixOperator { op: &'static str, operand: &'static str },
    /// Name bound in no scope and not a native.
    UnknownIdentifier { name: String },
    /// Callee is not a function.
    NotCallable { type_name: &'static str },
    /// Argument count does not match the parameter list.
    ArityMismatch { expected: usize, got: usize },
    /// Left side of `=` is not an identifier.
    InvalidAssignmentTarget { target: String },
    /// `x[i]` or `x[a:b]` on something that is not an array.
    IndexNotSupported { type_name: &'static str },
    /// Array index is not an integer.
    InvalidIndex { type_name: &'static str },
    /// Slice bound is not an integer.
    InvalidSliceBound { type_name: &'static str },
    /// Subscription names a handler that is neither bound nor native.
    UnknownHandler { name: String },
    /// Error reported by a native function.
    Native { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TypeMismatch { left, op, right } => {
                write!(f, "type mismatch: {left} {} {right}", op.as_symbol())
            }
            ErrorKind::UnknownOperator { left, op, right } => {
                write!(f, "unknown operator: {left} {} {right}", op.as_symbol())
            }
            ErrorKind::UnknownPrefixOperator { op, operand } => {
                write!(f, "unknown operator: {op}{operand}")
            }
            ErrorKind::UnknownIdentifier { name } => write!(f, "identifier not found: {name}"),
            ErrorKind::NotCallable { type_name } => write!(f, "not a function: {type_name}"),
            ErrorKind::ArityMismatch { expected, got } => {
                write!(f, "wrong number of arguments: want={expected}, got={got}")
            }
            ErrorKind::InvalidAssignmentTarget { target } => {
                write!(f, "invalid assignment target: {target}")
            }
            ErrorKind::IndexNotSupported { type_name } => {
                write!(f, "index operator not supported: {type_name}")
            }
            ErrorKind::InvalidIndex { type_name } => {
                write!(f, "index must be INTEGER, got={type_name}")
            }
            ErrorKind::InvalidSliceBound { type_name } => {
                write!(f, "slice bound must be INTEGER, got={type_name}")
            }
            ErrorKind::UnknownHandler { name } => {
                write!(f, "subscription handler not found: {name}")
            }
            ErrorKind::Native { message } => f.write_str(message),
        }
    }
}

/// A recoverable, user-visible evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: ErrorKind,
}

impl EvalError {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        EvalError { kind }
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Unrecoverable evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalFault {
    #[error("division by zero")]
    DivisionByZero,
    /// A string template embedded a value with no text form.
    #[error("cannot convert {type_name} to string")]
    Unstringifiable { type_name: &'static str },
    /// A signal handler fired for a binding that no longer exists.
    #[error("binding `{name}` was removed while still observed")]
    BindingRemoved { name: String },
    #[error("maximum recursion depth exceeded ({depth})")]
    RecursionLimit { depth: usize },
}

// Factories

pub fn type_mismatch(left: &Value, op: BinaryOp, right: &Value) -> Value {
    Value::error(ErrorKind::TypeMismatch {
        left: left.type_name(),
        op,
        right: right.type_name(),
    })
}

pub fn unknown_operator(left: &Value, op: BinaryOp, right: &Value) -> Value {
    Value::error(ErrorKind::UnknownOperator {
        left: left.type_name(),
        op,
        right: right.type_name(),
    })
}

pub fn unknown_prefix_operator(op: &'static str, operand: &Value) -> Value {
    Value::error(ErrorKind::UnknownPrefixOperator {
        op,
        operand: operand.type_name(),
    })
}

pub fn unknown_identifier(name: &str) -> Value {
    Value::error(ErrorKind::UnknownIdentifier {
        name: name.to_string(),
    })
}

pub fn not_callable(callee: &Value) -> Value {
    Value::error(ErrorKind::NotCallable {
        type_name: callee.type_name(),
    })
}

pub fn arity_mismatch(expected: usize, got: usize) -> Value {
    Value::error(ErrorKind::ArityMismatch { expected, got })
}

pub fn invalid_assignment_target(target: String) -> Value {
    Value::error(ErrorKind::InvalidAssignmentTarget { target })
}

pub fn index_not_supported(left: &Value) -> Value {
    Value::error(ErrorKind::IndexNotSupported {
        type_name: left.type_name(),
    })
}

pub fn invalid_index(index: &Value) -> Value {
    Value::error(ErrorKind::InvalidIndex {
        type_name: index.type_name(),
    })
}

pub fn invalid_slice_bound(bound: &Value) -> Value {
    Value::error(ErrorKind::InvalidSliceBound {
        type_name: bound.type_name(),
    })
}

pub fn unknown_handler(name: &str) -> Value {
    Value::error(ErrorKind::UnknownHandler {
        name: name.to_string(),
    })
}

pub fn native_error(message: impl Into<String>) -> Value {
    Value::error(ErrorKind::Native {
        message: message.into(),
    })
}
