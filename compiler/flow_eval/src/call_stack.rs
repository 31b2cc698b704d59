//! Call depth tracking.
//!
//! Every user-function call enters the [`CallStack`]. Going past the limit
//! is an [`EvalFault::RecursionLimit`] rather than a host stack overflow.

use std::cell::Cell;

use crate::errors::EvalFault;

/// Default limit on nested user-function calls.
pub const DEFAULT_MAX_DEPTH: usize = 2048;

#[derive(Debug)]
pub struct CallStack {
    depth: Cell<usize>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            depth: Cell::new(0),
            max_depth,
        }
    }

    /// Enter one call; the returned guard leaves it when dropped.
    pub fn enter(&self) -> Result<CallGuard<'_>, EvalFault> {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Err(EvalFault::RecursionLimit {
                depth: self.max_depth,
            });
        }
        self.depth.set(depth + 1);
        Ok(CallGuard { stack: self })
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// RAII marker for one active call.
#[must_use]
pub struct CallGuard<'a> {
    stack: &'a CallStack,
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.stack.depth.set(self.stack.depth.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_depth() {
        let stack = CallStack::new(4);
        {
            let _outer = stack.enter();
            let _inner = stack.enter();
            assert_eq!(stack.depth(), 2);
        }
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_limit_is_a_fault() {
        let stack = CallStack::new(1);
        let _first = stack.enter();
        assert!(matches!(
            stack.enter(),
            Err(EvalFault::RecursionLimit { depth: 1 })
        ));
    }
}
