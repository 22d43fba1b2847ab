//! Explicit subscriptions that can be paused without losing their place.

use crate::event::Event;
use crate::observer::{EventListener, Observer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strata_core::{EventType, Object, RuntimeError};

struct ListenerState {
    handler: RefCell<EventListener>,
    paused: Cell<bool>,
}

/// One `(target, name, handler)` binding.
///
/// The listener registers a trampoline rather than the handler itself.
/// The trampoline identity is fixed at creation, so [`Listener::detach`]
/// removes exactly what [`Listener::attach`] added, and a paused listener
/// keeps its position in the target's list.
///
/// ```
/// use strata_core::Object;
/// use strata_events::{Event, Observer};
///
/// let panel = Object::new();
/// let listener = panel.on("resize", |event: &Event, _bind: &Object| {
///     event.set("seen", true);
///     Ok(())
/// });
///
/// listener.pause();
/// let event = panel.dispatch_event("resize", Event::new(), None).unwrap();
/// assert_eq!(event.get("seen"), None);
///
/// listener.resume();
/// let event = panel.dispatch_event("resize", Event::new(), None).unwrap();
/// assert!(event.get("seen").is_some());
/// ```
#[derive(Clone)]
pub struct Listener {
    target: Object,
    name: EventType,
    state: Rc<ListenerState>,
    trampoline: EventListener,
}

impl Listener {
    /// Create a detached listener.
    pub fn new(target: &Object, name: impl Into<EventType>, handler: EventListener) -> Self {
        let state = Rc::new(ListenerState {
            handler: RefCell::new(handler),
            paused: Cell::new(false),
        });
        let trampoline = {
            let state = Rc::clone(&state);
            EventListener::new(move |event: &Event, bind: &Object| -> Result<(), RuntimeError> {
                if state.paused.get() {
                    return Ok(());
                }
                let handler = state.handler.borrow().clone();
                handler.call(event, bind)
            })
        };
        Self {
            target: target.clone(),
            name: name.into(),
            state,
            trampoline,
        }
    }

    /// Subscribe the trampoline on the target.
    pub fn attach(&self) -> &Self {
        self.target
            .add_event_listener(self.name.clone(), self.trampoline.clone());
        self
    }

    /// Unsubscribe the trampoline from the target.
    pub fn detach(&self) -> &Self {
        self.target
            .remove_event_listener(self.name.clone(), &self.trampoline);
        self
    }

    /// Make the handler a no-op while staying subscribed.
    pub fn pause(&self) -> &Self {
        self.state.paused.set(true);
        self
    }

    /// Undo [`Listener::pause`].
    pub fn resume(&self) -> &Self {
        self.state.paused.set(false);
        self
    }

    /// Whether the listener is paused.
    pub fn is_paused(&self) -> bool {
        self.state.paused.get()
    }

    /// Swap the wrapped handler. The subscription itself is unchanged.
    pub fn set_handler(&self, handler: EventListener) -> &Self {
        *self.state.handler.borrow_mut() = handler;
        self
    }

    /// The observed object.
    pub fn target(&self) -> &Object {
        &self.target
    }

    /// The event name.
    pub fn name(&self) -> &EventType {
        &self.name
    }

    /// The function actually registered on the target.
    pub fn trampoline(&self) -> &EventListener {
        &self.trampoline
    }
}
