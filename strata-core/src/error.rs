//! Error types for the object runtime.

use crate::value::ValueKind;
use thiserror::Error;

/// Errors raised by class composition, method dispatch and event handlers.
///
/// Every error is synchronous and returned at the call site. Nothing in
/// the runtime retries or swallows them; event dispatch propagates a
/// handler's error to whoever called `fire` or `dispatch_event`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A protected member was invoked with no active caller, i.e. not
    /// from inside another method running on the same instance.
    #[error("trying to call a protected method: {method}")]
    ProtectedAccess {
        /// The member that was invoked.
        method: String,
    },

    /// `parent()` was invoked but no ancestor defines the member that is
    /// currently executing.
    #[error("the parent for this method does not exist: {method}")]
    NoParentImplementation {
        /// The member whose ancestor implementation was requested.
        method: String,
    },

    /// `call` named a member that neither the instance nor its class has.
    #[error("no member named {member}")]
    MissingMember {
        /// The requested member.
        member: String,
    },

    /// `call` named a member that holds data, not a function.
    #[error("member {member} is not callable (found {found})")]
    NotCallable {
        /// The requested member.
        member: String,
        /// What the member actually holds.
        found: ValueKind,
    },

    /// A mutator received a value of the wrong shape.
    #[error("mutator {mutator} expects {expected}, found {found}")]
    InvalidMutatorValue {
        /// The mutator key.
        mutator: String,
        /// Description of the accepted shape.
        expected: &'static str,
        /// What was actually supplied.
        found: ValueKind,
    },

    /// `Extends` would make a class its own ancestor.
    #[error("inheritance cycle: {class} cannot extend itself or a descendant")]
    InheritanceCycle {
        /// Name (or id) of the class being extended.
        class: String,
    },

    /// A bridged member received an argument of the wrong shape.
    #[error("{method}: argument {index} must be {expected}")]
    InvalidArgument {
        /// The member that was called.
        method: String,
        /// Zero-based argument position.
        index: usize,
        /// Description of the accepted shape.
        expected: &'static str,
    },

    /// A method body or event handler reported a failure.
    #[error("handler failed: {0}")]
    Handler(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
