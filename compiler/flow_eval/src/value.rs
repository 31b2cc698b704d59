//! Runtime values.

use std::fmt;
use std::rc::Rc;

use flow_ir::{AstPrinter, Block, Name, StringInterner};

use crate::environment::Environment;
use crate::errors::{ErrorKind, EvalError, EvalFault};
use crate::natives::NativeFn;

/// Result of evaluating an expression.
///
/// Everything but `Int`, `Bool` and `Null` is reference-counted, so cloning a
/// value never copies an array or string.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Null,
    Str(Rc<str>),
    Array(Rc<Vec<Value>>),
    Function(Rc<FunctionValue>),
    Native(NativeFunction),
    Error(Rc<EvalError>),
    /// Control-flow marker for `return`; unwrapped at call boundaries.
    Return(Box<Value>),
}

/// A user function together with the environment it was created in.
pub struct FunctionValue {
    pub params: Vec<Name>,
    pub body: Rc<Block>,
    pub env: Environment,
}

/// A host function callable from Flow.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    #[inline]
    pub fn error(kind: ErrorKind) -> Self {
        Value::Error(Rc::new(EvalError::new(kind)))
    }

    pub fn function(params: Vec<Name>, body: Rc<Block>, env: Environment) -> Self {
        Value::Function(Rc::new(FunctionValue { params, body, env }))
    }

    /// Upper-case type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "INTEGER",
            Value::Bool(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Str(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Function(_) => "FUNCTION",
            Value::Native(_) => "NATIVE_FUNCTION",
            Value::Error(_) => "ERROR",
            Value::Return(_) => "RETURN_VALUE",
        }
    }

    /// `Null` and `false` are falsy; everything else, `0` included, is truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// True for values that end a block early: errors and `return` markers.
    #[inline]
    pub fn is_abrupt(&self) -> bool {
        matches!(self, Value::Error(_) | Value::Return(_))
    }

    /// Strip a `return` marker.
    pub fn unwrap_return(self) -> Value {
        match self {
            Value::Return(inner) => *inner,
            other => other,
        }
    }

    /// Text form used inside string templates.
    ///
    /// Only scalars and strings have one; anything else is a fault.
    pub fn stringify(&self) -> Result<String, EvalFault> {
        match self {
            Value::Int(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Str(s) => Ok(s.to_string()),
            Value::Null => Ok("NULL".to_string()),
            other => Err(EvalFault::Unstringifiable {
                type_name: other.type_name(),
            }),
        }
    }

    /// Displayable rendering; functions print their source, so this needs
    /// the interner.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            interner,
        }
    }

    pub fn inspect(&self, interner: &StringInterner) -> String {
        self.display(interner).to_string()
    }
}

/// [`Value`] paired with the interner needed to print it.
pub struct ValueDisplay<'a> {
    value: &'a Value,
    interner: &'a StringInterner,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => f.write_str("NULL"),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.display(self.interner))?;
                }
                f.write_str("]")
            }
            Value::Function(func) => {
                f.write_str("(")?;
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(self.interner.lookup(*param))?;
                }
                let body = AstPrinter::new(self.interner).block_to_string(&func.body);
                write!(f, ") => {body}")
            }
            Value::Native(_) => f.write_str("native function"),
            Value::Error(err) => write!(f, "ERROR: {err}"),
            Value::Return(inner) => write!(f, "{}", inner.display(self.interner)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Null => f.write_str("Null"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(func) => write!(f, "Function(arity={})", func.params.len()),
            Value::Native(native) => native.fmt(f),
            Value::Error(err) => write!(f, "Error({:?})", err.message()),
            Value::Return(inner) => f.debug_tuple("Return").field(inner).finish(),
        }
    }
}

/// Structural equality for data; functions compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Return(a), Value::Return(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::int(1).type_name(), "INTEGER");
        assert_eq!(Value::Bool(true).type_name(), "BOOLEAN");
        assert_eq!(Value::Null.type_name(), "NULL");
        assert_eq!(Value::string("a").type_name(), "STRING");
        assert_eq!(Value::array(vec![]).type_name(), "ARRAY");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::int(0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_inspect_nested_array() {
        let interner = StringInterner::new();
        let value = Value::array(vec![
            Value::int(1),
            Value::array(vec![Value::Bool(true), Value::Null]),
            Value::string("x"),
        ]);
        assert_eq!(value.inspect(&interner), "[1, [true, NULL], x]");
    }

    #[test]
    fn test_stringify_rejects_arrays() {
        let err = Value::array(vec![]).stringify();
        assert_eq!(
            err,
            Err(EvalFault::Unstringifiable { type_name: "ARRAY" })
        );
    }

    #[test]
    fn test_unwrap_return() {
        let value = Value::Return(Box::new(Value::int(3)));
        assert!(value.is_abrupt());
        assert_eq!(value.unwrap_return(), Value::int(3));
    }
}
