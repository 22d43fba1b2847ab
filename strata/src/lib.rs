#![deny(missing_docs)]
//! # strata — umbrella crate
//!
//! Provides a single import surface for the object runtime and its event
//! capabilities. Re-exports the member crates behind feature flags, plus a
//! `prelude` for the happy path.

pub use strata_core;
#[cfg(feature = "events")]
pub use strata_events;

pub use strata_core::mutator;

/// Happy-path imports for defining classes and wiring events.
pub mod prelude {
    pub use strata_core::{
        Class, ClassName, Descriptor, EXTENDS, EventType, Function, IMPLEMENTS, Map, Object,
        ObjectId, RuntimeError, Value, ValueKind,
    };

    #[cfg(feature = "events")]
    pub use strata_events::{
        Event, EventInit, EventListener, Events, GET_PARENT, Listener, Observer, Store, mixin,
    };
}
