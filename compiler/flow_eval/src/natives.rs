//! Native (host) functions.
//!
//! Natives are looked up by name only after every scope has missed, so a
//! user binding called `len` shadows the builtin. They receive fully
//! evaluated arguments and report misuse as an `Error` value.

use rustc_hash::FxHashMap;

use flow_ir::{Name, StringInterner};

use crate::errors::native_error;
use crate::output::Output;
use crate::value::{NativeFunction, Value};

/// Signature of a native function.
pub type NativeFn = fn(&NativeCtx<'_>, &[Value]) -> Value;

/// What a native can reach besides its arguments.
pub struct NativeCtx<'a> {
    pub interner: &'a StringInterner,
    pub output: &'a Output,
}

/// Name to native function table.
#[derive(Clone, Default)]
pub struct NativeRegistry {
    functions: FxHashMap<Name, NativeFunction>,
}

impl NativeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `len` and `print`.
    pub fn with_builtins(interner: &StringInterner) -> Self {
        let mut registry = Self::new();
        registry.register(interner, "len", builtin_len);
        registry.register(interner, "print", builtin_print);
        registry
    }

    /// Add or replace a native.
    pub fn register(&mut self, interner: &StringInterner, name: &'static str, func: NativeFn) {
        self.functions
            .insert(interner.intern(name), NativeFunction { name, func });
    }

    pub fn get(&self, name: Name) -> Option<NativeFunction> {
        self.functions.get(&name).copied()
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.functions.contains_key(&name)
    }
}

/// `len(x)`: byte length of a string or element count of an array.
fn builtin_len(_ctx: &NativeCtx<'_>, args: &[Value]) -> Value {
    let [arg] = args else {
        return native_error(format!("expected 1 argument for len got={}", args.len()));
    };
    let len = match arg {
        Value::Str(s) => s.len(),
        Value::Array(items) => items.len(),
        other => {
            return native_error(format!(
                "argument to \"len\" not supported, got={}",
                other.type_name()
            ))
        }
    };
    i64::try_from(len).map_or_else(
        |_| native_error("length does not fit in INTEGER"),
        Value::int,
    )
}

/// `print(a, b, …)`: one line per argument.
fn builtin_print(ctx: &NativeCtx<'_>, args: &[Value]) -> Value {
    for arg in args {
        ctx.output.write_line(&arg.inspect(ctx.interner));
    }
    Value::Null
}
