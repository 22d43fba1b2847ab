//! The process-wide mutator table.
//!
//! A mutator intercepts one descriptor key at composition time instead of
//! the default merge. The table starts with [`EXTENDS`] and
//! [`IMPLEMENTS`]; [`register`] adds or replaces entries at runtime, so
//! new composition keywords never require changes to the class factory.

use crate::class::Class;
use crate::error::RuntimeError;
use crate::value::{Value, merge_into};
use crate::wrap;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Descriptor key naming the parent class.
pub const EXTENDS: &str = "Extends";

/// Descriptor key naming mixins (one class or mapping, or a sequence).
pub const IMPLEMENTS: &str = "Implements";

/// Member name `Extends` installs for `parent()` calls.
pub const PARENT: &str = "parent";

/// A composition-time transform for one descriptor key.
///
/// Receives the class being composed and the descriptor value. Returning
/// `Ok(None)` means the mutator fully handled the key; `Ok(Some(v))` asks
/// the factory to merge `v` under the key with the default rules.
pub type Mutator = dyn Fn(&Class, Value) -> Result<Option<Value>, RuntimeError> + Send + Sync;

static MUTATORS: LazyLock<RwLock<HashMap<String, Arc<Mutator>>>> = LazyLock::new(|| {
    let mut table: HashMap<String, Arc<Mutator>> = HashMap::new();
    table.insert(EXTENDS.to_string(), Arc::new(extends));
    table.insert(IMPLEMENTS.to_string(), Arc::new(implements));
    RwLock::new(table)
});

/// Register (or replace) the mutator for `key`.
pub fn register(
    key: impl Into<String>,
    mutator: impl Fn(&Class, Value) -> Result<Option<Value>, RuntimeError> + Send + Sync + 'static,
) {
    let key = key.into();
    tracing::debug!(mutator = %key, "mutator.register");
    MUTATORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::new(mutator));
}

/// Remove the mutator for `key`, returning whether one was registered.
pub fn unregister(key: &str) -> bool {
    MUTATORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(key)
        .is_some()
}

/// Whether a mutator is registered for `key`.
pub fn is_registered(key: &str) -> bool {
    lookup(key).is_some()
}

/// The mutator for `key`. The table lock is released before returning, so
/// a mutator may itself compose classes.
pub(crate) fn lookup(key: &str) -> Option<Arc<Mutator>> {
    MUTATORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
}

/// `Extends`: record the parent and rebase this class's prototype on the
/// parent's composed defaults.
///
/// Members already implemented on the class stay on top of the inherited
/// ones. A `parent` member is installed unless the prototype already has
/// one.
fn extends(class: &Class, value: Value) -> Result<Option<Value>, RuntimeError> {
    let parent = match value {
        Value::Class(parent) => parent,
        other => {
            return Err(RuntimeError::InvalidMutatorValue {
                mutator: EXTENDS.to_string(),
                expected: "a class",
                found: other.kind(),
            });
        }
    };
    if parent.ptr_eq(class) || parent.is_subclass_of(class) {
        return Err(RuntimeError::InheritanceCycle {
            class: class.to_string(),
        });
    }

    let mut prototype = parent.get_prototype().members();
    let own = class.replace_prototype(Default::default());
    merge_into(&mut prototype, own);
    prototype
        .entry(PARENT.to_string())
        .or_insert_with(|| Value::Function(wrap::parent_member()));
    class.replace_prototype(prototype);
    class.set_parent(parent);
    Ok(None)
}

/// `Implements`: merge each item's members, in order.
///
/// A class item contributes its composed defaults (via
/// [`Class::get_prototype`]); a mapping contributes its entries. Methods
/// are re-installed as trampolines owned by the implementing class.
fn implements(class: &Class, value: Value) -> Result<Option<Value>, RuntimeError> {
    let items = match value {
        Value::Array(items) => items,
        single => vec![single],
    };
    for item in items {
        match item {
            Value::Class(mixin) => class.implement_all(mixin.get_prototype().members())?,
            Value::Map(members) => class.implement_all(members)?,
            other => {
                return Err(RuntimeError::InvalidMutatorValue {
                    mutator: IMPLEMENTS.to_string(),
                    expected: "a class or a map",
                    found: other.kind(),
                });
            }
        }
    }
    Ok(None)
}
