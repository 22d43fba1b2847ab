#![deny(missing_docs)]
//! Event capabilities for strata objects.
//!
//! Every capability attaches its state to an [`strata_core::Object`]
//! lazily, in a slot of its own, the first time it is used:
//!
//! - [`Events`]: a registry of [`strata_core::Function`] handlers per
//!   event type, deduplicated by identity. Firing runs a snapshot of the
//!   list; `ignore` requests issued while a fire is in progress are queued
//!   and replayed after the outermost fire on that object finishes.
//! - [`Observer`]: per-object listener lists with bubbling dispatch of an
//!   [`Event`] through each target's `getParent` member.
//! - [`Listener`]: one subscription that can be attached, detached, paused
//!   and resumed without losing its position.
//! - [`Store`]: hidden key/value storage with memoized defaults.
//!
//! [`mixin`] packages the registry and the store as classes so they can be
//! composed into other classes with `Implements`.
//!
//! Handler errors are never swallowed: the first one stops the fire or
//! dispatch and is returned to the caller.

pub mod event;
pub mod listener;
pub mod mixin;
pub mod observer;
pub mod registry;
pub mod storage;

pub use event::{Event, EventInit};
pub use listener::Listener;
pub use observer::{EventListener, GET_PARENT, ListenerFn, Observer, ObserverLists};
pub use registry::{Events, Registry};
pub use storage::{Storage, Store};
