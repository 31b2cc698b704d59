//! Scope chain of observable bindings.
//!
//! A binding maps a name to the expression it was bound to and the
//! [`Signal`] that announces changes to it. Lookups walk outward from the
//! innermost scope; writes only ever touch the innermost one.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use flow_ir::{Expr, Name};

use crate::signal::Signal;

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through [`LocalScope::new`]. `#[repr(transparent)]`
/// keeps the layout identical to `Rc<RefCell<T>>`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An expression bound to a name, plus its change signal.
#[derive(Clone, Debug)]
pub struct Binding {
    pub expr: Rc<Expr>,
    pub signal: Signal,
}

impl Binding {
    pub fn new(expr: Rc<Expr>, signal: Signal) -> Self {
        Binding { expr, signal }
    }

    /// Whether the binding is just its own name (`x` bound to `x`).
    #[inline]
    pub(crate) fn is_self_reference(&self, name: Name) -> bool {
        self.expr.as_ident() == Some(name)
    }
}

struct Scope {
    bindings: FxHashMap<Name, Binding>,
    /// Subscription signals created in this scope; they live as long as it does.
    subscriptions: Vec<Signal>,
    parent: Option<Environment>,
}

/// Handle to one scope and, through its parents, the whole chain.
///
/// Cloning shares the scope. Function values hold one of these for the
/// scope they were created in.
#[derive(Clone)]
pub struct Environment(LocalScope<Scope>);

/// Non-owning [`Environment`] handle for signal handlers.
#[derive(Clone)]
pub struct WeakEnvironment(Weak<RefCell<Scope>>);

impl WeakEnvironment {
    pub fn upgrade(&self) -> Option<Environment> {
        self.0.upgrade().map(|rc| Environment(LocalScope(rc)))
    }
}

impl Environment {
    /// A root scope.
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    /// A fresh scope in front of `outer`.
    pub fn enclosed(outer: &Environment) -> Self {
        Self::with_parent(Some(outer.clone()))
    }

    fn with_parent(parent: Option<Environment>) -> Self {
        Environment(LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            subscriptions: Vec::new(),
            parent,
        }))
    }

    pub fn outer(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.borrow().parent.is_none()
    }

    /// Find `name`, innermost scope first.
    ///
    /// A binding that is only its own name is skipped in favour of the next
    /// scope out, so `x` bound to `x` never resolves to itself.
    pub fn get(&self, name: Name) -> Option<Binding> {
        self.lookup(name).map(|(binding, _)| binding)
    }

    /// Like [`get`](Self::get), also returning the scope that holds the binding.
    pub fn lookup(&self, name: Name) -> Option<(Binding, Environment)> {
        let mut scope = self.clone();
        loop {
            if let Some(binding) = scope.get_local(name) {
                if !binding.is_self_reference(name) {
                    return Some((binding, scope));
                }
            }
            scope = scope.outer()?;
        }
    }

    /// The binding for `name` in this scope only.
    pub fn get_local(&self, name: Name) -> Option<Binding> {
        self.0.borrow().bindings.get(&name).cloned()
    }

    /// Create or overwrite `name` in this scope. Outer scopes are never written.
    pub fn set(&self, name: Name, binding: Binding) {
        self.0.borrow_mut().bindings.insert(name, binding);
    }

    pub fn add_subscription(&self, signal: Signal) {
        self.0.borrow_mut().subscriptions.push(signal);
    }

    pub fn subscription_count(&self) -> usize {
        self.0.borrow().subscriptions.len()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        self.0.ptr_eq(&other.0)
    }

    pub fn downgrade(&self) -> WeakEnvironment {
        WeakEnvironment(Rc::downgrade(&self.0 .0))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Environment")
            .field("bindings", &scope.bindings.len())
            .field("subscriptions", &scope.subscriptions.len())
            .field("root", &scope.parent.is_none())
            .finish()
    }
}
