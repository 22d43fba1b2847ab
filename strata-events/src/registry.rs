//! The per-object event registry.
//!
//! Handlers are [`Function`]s grouped by [`EventType`], kept in
//! registration order and deduplicated by identity. Firing works on a
//! snapshot of the list taken when the fire begins: handlers added during
//! the fire do not run in it, and removals requested during the fire are
//! queued and replayed once the outermost fire on that object finishes.

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strata_core::{EventType, Function, Object, RuntimeError, Value};

/// One deferred removal, in the three shapes `ignore` comes in.
#[derive(Debug, Clone)]
enum IgnoreRequest {
    One(EventType, Function),
    Type(EventType),
    All,
}

/// The registry slot attached to an object on first `listen`.
#[derive(Default)]
pub struct Registry {
    bindings: RefCell<IndexMap<EventType, Vec<Function>>>,
    depth: Cell<usize>,
    deferred: RefCell<Vec<IgnoreRequest>>,
}

impl Registry {
    fn listen(&self, ty: EventType, handler: Function) {
        let mut bindings = self.bindings.borrow_mut();
        let handlers = bindings.entry(ty).or_default();
        if !handlers.iter().any(|existing| existing.ptr_eq(&handler)) {
            handlers.push(handler);
        }
    }

    fn ignore(&self, request: IgnoreRequest) {
        if self.depth.get() > 0 {
            self.deferred.borrow_mut().push(request);
        } else {
            self.apply(request);
        }
    }

    fn apply(&self, request: IgnoreRequest) {
        let mut bindings = self.bindings.borrow_mut();
        match request {
            IgnoreRequest::One(ty, handler) => {
                if let Some(handlers) = bindings.get_mut(&ty) {
                    if let Some(index) = handlers.iter().position(|h| h.ptr_eq(&handler)) {
                        handlers.remove(index);
                    }
                }
            }
            IgnoreRequest::Type(ty) => {
                if let Some(handlers) = bindings.get_mut(&ty) {
                    handlers.clear();
                }
            }
            IgnoreRequest::All => bindings.clear(),
        }
    }

    fn snapshot(&self, ty: &EventType) -> Vec<Function> {
        self.bindings
            .borrow()
            .get(ty)
            .cloned()
            .unwrap_or_default()
    }

    fn begin_fire(self: &Rc<Self>) -> FiringGuard {
        self.depth.set(self.depth.get() + 1);
        FiringGuard {
            registry: Rc::clone(self),
        }
    }

    /// Whether a fire is in progress on this registry.
    pub fn is_firing(&self) -> bool {
        self.depth.get() > 0
    }

    /// Number of removals waiting for the current fire to finish.
    pub fn pending_ignores(&self) -> usize {
        self.deferred.borrow().len()
    }

    /// Event types that currently have at least one handler.
    pub fn types(&self) -> Vec<EventType> {
        self.bindings
            .borrow()
            .iter()
            .filter(|(_, handlers)| !handlers.is_empty())
            .map(|(ty, _)| ty.clone())
            .collect()
    }
}

/// Ends one fire. When the outermost fire ends, queued removals are
/// replayed in the order they were requested, whether the fire succeeded
/// or a handler failed.
struct FiringGuard {
    registry: Rc<Registry>,
}

impl Drop for FiringGuard {
    fn drop(&mut self) {
        let depth = self.registry.depth.get().saturating_sub(1);
        self.registry.depth.set(depth);
        if depth > 0 {
            return;
        }
        let deferred = std::mem::take(&mut *self.registry.deferred.borrow_mut());
        if !deferred.is_empty() {
            tracing::trace!(ignores = deferred.len(), "events.replay");
        }
        for request in deferred {
            self.registry.apply(request);
        }
    }
}

/// Typed event subscription on any [`Object`].
///
/// ```
/// use strata_core::{Function, Object, Value};
/// use strata_events::Events;
///
/// let button = Object::new();
/// let clicked = Function::new(|this, args| {
///     this.set("clicks", args[0].clone());
///     Ok(Value::Null)
/// });
/// button.listen("click", clicked);
/// button.fire("click", &[Value::from(1)]).unwrap();
/// assert_eq!(button.get("clicks"), Some(Value::from(1)));
/// ```
pub trait Events {
    /// Register `handler` for `ty`. Registering the same identity twice
    /// for one type is a no-op.
    fn listen(&self, ty: impl Into<EventType>, handler: Function) -> &Self;

    /// [`Events::listen`] every pair, in iteration order.
    fn listen_all<K: Into<EventType>>(&self, pairs: impl IntoIterator<Item = (K, Function)>)
    -> &Self;

    /// Remove `handler` from `ty`. Silent if it is not registered.
    fn ignore(&self, ty: impl Into<EventType>, handler: &Function) -> &Self;

    /// Remove every handler for `ty`.
    fn ignore_type(&self, ty: impl Into<EventType>) -> &Self;

    /// Remove every handler for every type.
    fn ignore_all(&self) -> &Self;

    /// Invoke the handlers registered for `ty`, in order, with this object
    /// as the receiver and `args` as arguments.
    ///
    /// The first handler error stops the fire and is returned.
    fn fire(&self, ty: impl Into<EventType>, args: &[Value]) -> Result<(), RuntimeError>;

    /// The handlers currently registered for `ty`, in order.
    fn listeners(&self, ty: impl Into<EventType>) -> Vec<Function>;
}

impl Events for Object {
    fn listen(&self, ty: impl Into<EventType>, handler: Function) -> &Self {
        self.slot::<Registry>().listen(ty.into(), handler);
        self
    }

    fn listen_all<K: Into<EventType>>(
        &self,
        pairs: impl IntoIterator<Item = (K, Function)>,
    ) -> &Self {
        let registry = self.slot::<Registry>();
        for (ty, handler) in pairs {
            registry.listen(ty.into(), handler);
        }
        self
    }

    fn ignore(&self, ty: impl Into<EventType>, handler: &Function) -> &Self {
        if let Some(registry) = self.existing_slot::<Registry>() {
            registry.ignore(IgnoreRequest::One(ty.into(), handler.clone()));
        }
        self
    }

    fn ignore_type(&self, ty: impl Into<EventType>) -> &Self {
        if let Some(registry) = self.existing_slot::<Registry>() {
            registry.ignore(IgnoreRequest::Type(ty.into()));
        }
        self
    }

    fn ignore_all(&self) -> &Self {
        if let Some(registry) = self.existing_slot::<Registry>() {
            registry.ignore(IgnoreRequest::All);
        }
        self
    }

    fn fire(&self, ty: impl Into<EventType>, args: &[Value]) -> Result<(), RuntimeError> {
        let Some(registry) = self.existing_slot::<Registry>() else {
            return Ok(());
        };
        let ty: EventType = ty.into();
        let handlers = registry.snapshot(&ty);
        tracing::trace!(
            object = %self.id(),
            event = %ty,
            handlers = handlers.len(),
            "events.fire"
        );

        let _firing = registry.begin_fire();
        for handler in &handlers {
            handler.call(self, args)?;
        }
        Ok(())
    }

    fn listeners(&self, ty: impl Into<EventType>) -> Vec<Function> {
        self.existing_slot::<Registry>()
            .map(|registry| registry.snapshot(&ty.into()))
            .unwrap_or_default()
    }
}
