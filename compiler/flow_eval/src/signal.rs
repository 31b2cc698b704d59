//! Signal graph: change notification between bindings.
//!
//! Every binding owns a [`Signal`]. A signal keeps a list of observers (other
//! signals) and forwards each notification to them in registration order.
//! Observer edges are weak: a signal is kept alive only by the binding or
//! subscription that owns it, never by the signals it observes.
//!
//! Each notification carries a [`TraceId`]. A signal that has already seen an
//! id ignores it, so a change reaches every node of a diamond or a cycle
//! exactly once.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;

use crate::errors::EvalFault;

/// Identifies one logical change as it travels through the graph.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TraceId(u64);

impl TraceId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Monotonic source of fresh trace ids, one per interpreter.
#[derive(Debug)]
pub struct TraceIds {
    next: Cell<u64>,
}

impl TraceIds {
    pub fn new() -> Self {
        TraceIds { next: Cell::new(1) }
    }

    pub fn mint(&self) -> TraceId {
        let id = self.next.get();
        self.next.set(id.wrapping_add(1));
        TraceId(id)
    }
}

impl Default for TraceIds {
    fn default() -> Self {
        Self::new()
    }
}

type Handler = Rc<dyn Fn(TraceId) -> Result<(), EvalFault>>;

struct SignalNode {
    observers: RefCell<Vec<Weak<SignalNode>>>,
    /// Signals this one observes; kept so the edges can be cut on reassignment.
    sources: RefCell<Vec<Weak<SignalNode>>>,
    history: RefCell<FxHashSet<TraceId>>,
    handler: RefCell<Option<Handler>>,
}

/// Shared handle to a node of the signal graph.
#[derive(Clone)]
pub struct Signal(Rc<SignalNode>);

/// Non-owning handle, used by handlers that refer back to their own signal.
#[derive(Clone)]
pub struct WeakSignal(Weak<SignalNode>);

impl WeakSignal {
    pub fn upgrade(&self) -> Option<Signal> {
        self.0.upgrade().map(Signal)
    }
}

impl Signal {
    pub fn new() -> Self {
        Signal(Rc::new(SignalNode {
            observers: RefCell::new(Vec::new()),
            sources: RefCell::new(Vec::new()),
            history: RefCell::new(FxHashSet::default()),
            handler: RefCell::new(None),
        }))
    }

    /// Append `observer` to the notification list.
    ///
    /// Repeated registration is allowed and produces repeated edges; the
    /// trace history keeps the extra edges from doing extra work.
    pub fn register(&self, observer: &Signal) {
        self.0.observers.borrow_mut().push(Rc::downgrade(&observer.0));
        observer.0.sources.borrow_mut().push(Rc::downgrade(&self.0));
    }

    /// Register `self` as an observer of `source`.
    #[inline]
    pub fn observe(&self, source: &Signal) {
        source.register(self);
    }

    /// Register every live observer of `previous` on this signal too.
    pub fn adopt_observers(&self, previous: &Signal) {
        let observers: Vec<Signal> = previous
            .0
            .observers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(Signal)
            .collect();
        for observer in observers.iter().filter(|o| !o.ptr_eq(self)) {
            self.register(observer);
        }
    }

    /// Detach from every signal this one observes.
    pub fn clear_sources(&self) {
        let me = Rc::as_ptr(&self.0);
        for source in self.0.sources.take() {
            if let Some(source) = source.upgrade() {
                source
                    .observers
                    .borrow_mut()
                    .retain(|w| w.strong_count() > 0 && !std::ptr::eq(w.as_ptr(), me));
            }
        }
    }

    /// Replace the handler run when this signal is notified.
    pub fn set_handler(&self, handler: impl Fn(TraceId) -> Result<(), EvalFault> + 'static) {
        *self.0.handler.borrow_mut() = Some(Rc::new(handler));
    }

    /// Notify this signal and, transitively, its observers.
    ///
    /// With no id a fresh one is minted. An id this signal has already seen
    /// is absorbed: no handler runs and nothing is forwarded. Otherwise the
    /// handler runs first, then every live observer is notified with the
    /// same id, depth first, in registration order.
    pub fn notify(&self, id: Option<TraceId>, ids: &TraceIds) -> Result<(), EvalFault> {
        let id = id.unwrap_or_else(|| ids.mint());
        self.propagate(id)
    }

    /// [`notify`](Self::notify) with an id already in hand.
    pub fn propagate(&self, id: TraceId) -> Result<(), EvalFault> {
        flow_stack::ensure_sufficient_stack(|| {
            if !self.0.history.borrow_mut().insert(id) {
                tracing::trace!(trace = id.raw(), "notification absorbed");
                return Ok(());
            }

            // Clone out before calling: the handler may touch this signal.
            let handler = self.0.handler.borrow().clone();
            if let Some(handler) = handler {
                handler(id)?;
            }

            let observers: Vec<Signal> = {
                let mut observers = self.0.observers.borrow_mut();
                observers.retain(|w| w.strong_count() > 0);
                observers.iter().filter_map(Weak::upgrade).map(Signal).collect()
            };
            tracing::trace!(
                trace = id.raw(),
                observers = observers.len(),
                "signal notified"
            );
            for observer in observers {
                observer.propagate(id)?;
            }
            Ok(())
        })
    }

    /// Whether this signal has processed `id`.
    pub fn has_seen(&self, id: TraceId) -> bool {
        self.0.history.borrow().contains(&id)
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.0
            .observers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Signal) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakSignal {
        WeakSignal(Rc::downgrade(&self.0))
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.observer_count())
            .field("seen", &self.0.history.borrow().len())
            .finish()
    }
}
