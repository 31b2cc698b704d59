//! String templates, array literals, indexing and slicing.

use std::rc::Rc;

use flow_ir::{Expr, StrPart};

use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{
    index_not_supported, invalid_index, invalid_slice_bound, EvalFault, EvalResult,
};
use crate::value::Value;

impl Interpreter {
    pub(super) fn eval_template(&self, parts: &[StrPart], env: &Environment) -> EvalResult {
        let mut out = String::new();
        for part in parts {
            match part {
                StrPart::Text(text) => out.push_str(text),
                StrPart::Expr(expr) => {
                    let value = self.eval_expr(expr, env)?;
                    if value.is_abrupt() {
                        return Ok(value);
                    }
                    out.push_str(&value.stringify()?);
                }
            }
        }
        Ok(Value::string(out))
    }

    pub(super) fn eval_array(&self, items: &[Rc<Expr>], env: &Environment) -> EvalResult {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let value = self.eval_expr(item, env)?;
            if value.is_abrupt() {
                return Ok(value);
            }
            values.push(value);
        }
        Ok(Value::array(values))
    }

    /// `left[index]`; a negative or out-of-range index yields `Null`.
    pub(super) fn eval_index(
        &self,
        left: &Rc<Expr>,
        index: &Rc<Expr>,
        env: &Environment,
    ) -> EvalResult {
        let left = self.eval_expr(left, env)?;
        if left.is_abrupt() {
            return Ok(left);
        }
        let index = self.eval_expr(index, env)?;
        if index.is_abrupt() {
            return Ok(index);
        }
        match (&left, &index) {
            (Value::Array(items), Value::Int(i)) => Ok(usize::try_from(*i)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or(Value::Null)),
            (Value::Array(_), other) => Ok(invalid_index(other)),
            (other, _) => Ok(index_not_supported(other)),
        }
    }

    /// `left[lower:upper]`; bounds are clamped to the array, so the result
    /// has `max(0, min(upper, len) - max(lower, 0))` elements.
    pub(super) fn eval_slice(
        &self,
        left: &Rc<Expr>,
        lower: Option<&Rc<Expr>>,
        upper: Option<&Rc<Expr>>,
        env: &Environment,
    ) -> EvalResult {
        let left = self.eval_expr(left, env)?;
        if left.is_abrupt() {
            return Ok(left);
        }
        let Value::Array(items) = &left else {
            return Ok(index_not_supported(&left));
        };
        let len = items.len();
        let lower = match self.eval_bound(lower, 0, len, env)? {
            Ok(bound) => bound,
            Err(value) => return Ok(value),
        };
        let upper = match self.eval_bound(upper, len, len, env)? {
            Ok(bound) => bound,
            Err(value) => return Ok(value),
        };
        if lower >= upper {
            return Ok(Value::array(Vec::new()));
        }
        Ok(Value::array(items[lower..upper].to_vec()))
    }

    /// A slice bound clamped into `0..=len`. The inner `Err` is an abrupt
    /// value to return as-is.
    fn eval_bound(
        &self,
        bound: Option<&Rc<Expr>>,
        default: usize,
        len: usize,
        env: &Environment,
    ) -> Result<Result<usize, Value>, EvalFault> {
        let Some(bound) = bound else {
            return Ok(Ok(default));
        };
        let value = self.eval_expr(bound, env)?;
        match value {
            Value::Int(n) => Ok(Ok(usize::try_from(n).map_or(0, |n| n.min(len)))),
            abrupt if abrupt.is_abrupt() => Ok(Err(abrupt)),
            other => Ok(Err(invalid_slice_bound(&other))),
        }
    }
}
