//! # strata-core — a dynamic object runtime
//!
//! This crate compiles flat member descriptors into classes with single
//! inheritance, mixins, protected methods and explicit parent calls, all
//! on top of plain dynamic objects.
//!
//! ## The Pieces
//!
//! | Piece | Types | What it does |
//! |-------|-------|-------------|
//! | Values | [`Value`], [`Map`] | The data and reference universe objects hold |
//! | Functions | [`Function`] | Shared callables, optionally protected or hidden |
//! | Objects | [`Object`] | Instances: own fields, caller frames, capability slots |
//! | Classes | [`Class`], [`Descriptor`] | Compile descriptors; isolate instance state |
//! | Mutators | [`mutator`] | `Extends`, `Implements`, and any key you register |
//!
//! ## Dispatch Rules
//!
//! Every function member of a class is installed behind a trampoline that
//! pushes a caller frame on the receiver while it runs. A protected member
//! refuses to run when the receiver has no frame (it was called from
//! outside the instance). [`Object::parent`] uses the top frame to find the
//! member that is running and the class that owns it, then runs the
//! nearest ancestor implementation.
//!
//! ## Threading
//!
//! Objects, classes and functions are `Rc`-shared and stay on one thread.
//! The mutator table is the only process-wide state and is lock-protected.

#![deny(missing_docs)]

pub mod class;
pub mod descriptor;
pub mod error;
pub mod function;
pub mod id;
pub mod mutator;
pub mod object;
pub mod value;
mod wrap;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use class::{CONSTRUCTOR, Class, INITIALIZE};
pub use descriptor::Descriptor;
pub use error::RuntimeError;
pub use function::{Function, NativeFn};
pub use id::{ClassName, EventType, ObjectId};
pub use mutator::{EXTENDS, IMPLEMENTS, Mutator, PARENT};
pub use object::Object;
pub use value::{Map, Value, ValueKind, merge_into};
