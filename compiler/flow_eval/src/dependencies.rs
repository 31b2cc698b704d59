//! Dependency recording.
//!
//! While a `let`, assignment or parameter binding is being evaluated, every
//! binding whose identifier gets resolved is recorded into the innermost open
//! frame. `let` and assignment also record what the bound expression could
//! read on branches the evaluation did not take. The new binding's signal
//! then observes exactly those signals.

use std::cell::RefCell;

use crate::signal::Signal;

#[derive(Default)]
pub(crate) struct Dependencies {
    frames: RefCell<Vec<Vec<Signal>>>,
}

impl Dependencies {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Open a frame; closed by [`DependencyFrame::finish`],
    /// [`DependencyFrame::discard`], or on drop (same as `finish`).
    pub(crate) fn frame(&self) -> DependencyFrame<'_> {
        self.frames.borrow_mut().push(Vec::new());
        DependencyFrame {
            deps: self,
            open: true,
        }
    }

    /// Record `signal` in the innermost frame. No-op when no frame is open.
    pub(crate) fn record(&self, signal: &Signal) {
        let mut frames = self.frames.borrow_mut();
        if let Some(top) = frames.last_mut() {
            if !top.iter().any(|s| s.ptr_eq(signal)) {
                top.push(signal.clone());
            }
        }
    }

    fn pop(&self) -> Vec<Signal> {
        self.frames.borrow_mut().pop().unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.frames.borrow().len()
    }
}

/// An open recording frame.
#[must_use]
pub(crate) struct DependencyFrame<'a> {
    deps: &'a Dependencies,
    open: bool,
}

impl DependencyFrame<'_> {
    /// Close the frame, returning what it recorded. The signals are also
    /// recorded into the enclosing frame, so outer bindings depend on
    /// everything inner ones read.
    pub(crate) fn finish(mut self) -> Vec<Signal> {
        self.open = false;
        let signals = self.deps.pop();
        for signal in &signals {
            self.deps.record(signal);
        }
        signals
    }

    /// Close the frame and forget what it recorded.
    pub(crate) fn discard(mut self) {
        self.open = false;
        self.deps.pop();
    }
}

impl Drop for DependencyFrame<'_> {
    fn drop(&mut self) {
        if self.open {
            for signal in self.deps.pop() {
                self.deps.record(&signal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_frame_is_noop() {
        let deps = Dependencies::new();
        deps.record(&Signal::new());
        assert_eq!(deps.depth(), 0);
    }

    #[test]
    fn test_finish_merges_into_parent() {
        let deps = Dependencies::new();
        let a = Signal::new();
        let b = Signal::new();
        let outer = deps.frame();
        deps.record(&a);
        let inner = deps.frame();
        deps.record(&b);
        deps.record(&b);
        assert_eq!(inner.finish().len(), 1);
        let all = outer.finish();
        assert_eq!(all.len(), 2);
        assert!(all[0].ptr_eq(&a));
        assert!(all[1].ptr_eq(&b));
    }

    #[test]
    fn test_discard_forgets() {
        let deps = Dependencies::new();
        let outer = deps.frame();
        let inner = deps.frame();
        deps.record(&Signal::new());
        inner.discard();
        assert!(outer.finish().is_empty());
        assert_eq!(deps.depth(), 0);
    }
}
