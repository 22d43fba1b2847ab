//! Observer lists and bubbling dispatch.

use crate::event::Event;
use crate::listener::Listener;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use strata_core::{EventType, Object, RuntimeError, Value};

/// Name of the member an object exposes to take part in bubbling. It must
/// be callable and return the next object up the chain; any other result
/// ends the chain.
pub const GET_PARENT: &str = "getParent";

/// Signature of an observer callback: the event, then the bound receiver.
pub type ListenerFn = dyn Fn(&Event, &Object) -> Result<(), RuntimeError>;

/// A shared observer callback, compared by identity.
#[derive(Clone)]
pub struct EventListener(Rc<ListenerFn>);

impl EventListener {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&Event, &Object) -> Result<(), RuntimeError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke with `event` and `bind`.
    pub fn call(&self, event: &Event, bind: &Object) -> Result<(), RuntimeError> {
        (self.0)(event, bind)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &EventListener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0))
    }
}

/// The per-object observer lists. Unlike the event registry these allow
/// the same listener to appear more than once.
#[derive(Default)]
pub struct ObserverLists {
    lists: RefCell<IndexMap<EventType, Vec<EventListener>>>,
}

impl ObserverLists {
    fn snapshot(&self, name: &EventType) -> Vec<EventListener> {
        self.lists.borrow().get(name).cloned().unwrap_or_default()
    }
}

/// Observable objects: listener lists plus bubbling dispatch.
pub trait Observer {
    /// Append `listener` to the list for `name`. Duplicates are kept.
    fn add_event_listener(&self, name: impl Into<EventType>, listener: EventListener) -> &Self;

    /// Remove the first occurrence of `listener` from the list for
    /// `name`. Silent if it is not there.
    fn remove_event_listener(&self, name: impl Into<EventType>, listener: &EventListener)
    -> &Self;

    /// Dispatch `name` starting at this object and bubbling up through
    /// each target's `getParent` member.
    ///
    /// Every listener at a level runs with `(event, bind)`, where `bind`
    /// defaults to this object. After each level, a stopped event ends
    /// the dispatch. A listener error ends it too and is returned. The
    /// event is returned so the caller can inspect it.
    fn dispatch_event(
        &self,
        name: impl Into<EventType>,
        payload: impl Into<Event>,
        bind: Option<&Object>,
    ) -> Result<Event, RuntimeError>;

    /// Create a [`Listener`] for `name` around `handler` and attach it.
    fn on(
        &self,
        name: impl Into<EventType>,
        handler: impl Fn(&Event, &Object) -> Result<(), RuntimeError> + 'static,
    ) -> Listener;

    /// The listeners registered for `name` on this object, in order.
    fn event_listeners(&self, name: impl Into<EventType>) -> Vec<EventListener>;
}

impl Observer for Object {
    fn add_event_listener(&self, name: impl Into<EventType>, listener: EventListener) -> &Self {
        self.slot::<ObserverLists>()
            .lists
            .borrow_mut()
            .entry(name.into())
            .or_default()
            .push(listener);
        self
    }

    fn remove_event_listener(
        &self,
        name: impl Into<EventType>,
        listener: &EventListener,
    ) -> &Self {
        let name: EventType = name.into();
        if let Some(observers) = self.existing_slot::<ObserverLists>() {
            let mut lists = observers.lists.borrow_mut();
            if let Some(list) = lists.get_mut(&name) {
                if let Some(index) = list.iter().position(|l| l.ptr_eq(listener)) {
                    list.remove(index);
                }
            }
        }
        self
    }

    fn dispatch_event(
        &self,
        name: impl Into<EventType>,
        payload: impl Into<Event>,
        bind: Option<&Object>,
    ) -> Result<Event, RuntimeError> {
        let name: EventType = name.into();
        let event = payload.into();
        let bind = bind.unwrap_or(self);
        let mut visited = Vec::new();
        let mut target = self.clone();

        loop {
            visited.push(target.id());
            let listeners = target
                .existing_slot::<ObserverLists>()
                .map(|observers| observers.snapshot(&name))
                .unwrap_or_default();
            tracing::trace!(
                object = %target.id(),
                event = %name,
                listeners = listeners.len(),
                "observer.dispatch"
            );
            for listener in &listeners {
                listener.call(&event, bind)?;
            }

            if event.is_stopped() {
                break;
            }
            let Some(next) = parent_of(&target)? else {
                break;
            };
            if visited.contains(&next.id()) {
                tracing::warn!(
                    object = %next.id(),
                    event = %name,
                    "observer.cycle"
                );
                break;
            }
            target = next;
        }

        Ok(event)
    }

    fn on(
        &self,
        name: impl Into<EventType>,
        handler: impl Fn(&Event, &Object) -> Result<(), RuntimeError> + 'static,
    ) -> Listener {
        let listener = Listener::new(self, name, EventListener::new(handler));
        listener.attach();
        listener
    }

    fn event_listeners(&self, name: impl Into<EventType>) -> Vec<EventListener> {
        self.existing_slot::<ObserverLists>()
            .map(|observers| observers.snapshot(&name.into()))
            .unwrap_or_default()
    }
}

/// The next bubbling target: the object returned by the `getParent`
/// member, if the target has one.
fn parent_of(target: &Object) -> Result<Option<Object>, RuntimeError> {
    let Some(Value::Function(get_parent)) = target.get(GET_PARENT) else {
        return Ok(None);
    };
    match get_parent.call(target, &[])? {
        Value::Object(parent) => Ok(Some(parent)),
        _ => Ok(None),
    }
}
