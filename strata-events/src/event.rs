//! The stoppable event value passed through observer dispatch.

use std::cell::{Cell, RefCell};
use std::fmt;
use strata_core::{Map, Object, Value};

/// Options for building an [`Event`]. Unset fields keep their defaults:
/// not stopped, no target, empty data.
#[derive(Debug, Clone, Default)]
pub struct EventInit {
    /// Start out stopped.
    pub stopped: bool,
    /// The object the event is about.
    pub target: Option<Object>,
    /// Initial payload.
    pub data: Map,
}

/// A stoppable value carrying a key/value payload.
///
/// Listeners receive `&Event`; every accessor uses interior mutability so
/// a listener can stop the event or annotate its data and the change is
/// visible to every later listener and to the dispatcher.
#[derive(Default)]
pub struct Event {
    stopped: Cell<bool>,
    target: RefCell<Option<Object>>,
    data: RefCell<Map>,
}

impl Event {
    /// A fresh event with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop bubbling. Idempotent.
    pub fn stop(&self) -> &Self {
        self.stopped.set(true);
        self
    }

    /// Whether [`Event::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// Set one payload entry.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.data.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Set every pair, in iteration order.
    pub fn set_all<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> &Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.data.borrow_mut().insert(key.into(), value.into());
        }
        self
    }

    /// One payload entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.borrow().get(key).cloned()
    }

    /// Replace the whole payload.
    pub fn set_data(&self, data: Map) -> &Self {
        *self.data.borrow_mut() = data;
        self
    }

    /// Snapshot of the whole payload.
    pub fn data(&self) -> Map {
        self.data.borrow().clone()
    }

    /// Set the object the event is about.
    pub fn set_target(&self, target: Option<Object>) -> &Self {
        *self.target.borrow_mut() = target;
        self
    }

    /// The object the event is about.
    pub fn target(&self) -> Option<Object> {
        self.target.borrow().clone()
    }
}

impl From<EventInit> for Event {
    fn from(init: EventInit) -> Self {
        Self {
            stopped: Cell::new(init.stopped),
            target: RefCell::new(init.target),
            data: RefCell::new(init.data),
        }
    }
}

/// A bare payload becomes the data of a fresh event.
impl From<Map> for Event {
    fn from(data: Map) -> Self {
        EventInit {
            data,
            ..EventInit::default()
        }
        .into()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("stopped", &self.stopped.get())
            .field("target", &self.target.borrow())
            .field("data", &self.data.borrow())
            .finish()
    }
}
