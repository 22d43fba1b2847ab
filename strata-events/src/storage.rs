//! Per-object key/value storage with memoized defaults.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use strata_core::{Function, Map, Object, RuntimeError, Value};

/// The storage slot attached to an object on first use.
///
/// Entries holding [`Value::Null`] count as absent everywhere: they are
/// not returned by [`Store::retrieve`] and a default supplied to
/// [`Store::retrieve_or`] replaces them.
#[derive(Default)]
pub struct Storage {
    entries: RefCell<IndexMap<String, Value>>,
}

impl Storage {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .borrow()
            .get(key)
            .filter(|value| !value.is_null())
            .cloned()
    }

    fn insert(&self, key: String, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.entries
            .borrow_mut()
            .shift_remove(key)
            .filter(|value| !value.is_null())
    }

    /// Keys currently stored, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Hidden key/value storage on any [`Object`].
///
/// Storage is separate from the object's fields: nothing stored here is
/// visible through `get`, `members` or `Implements`.
pub trait Store {
    /// Store `value` under `key`, replacing any previous value.
    fn store(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self;

    /// Store every pair, in iteration order.
    fn store_all<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> &Self
    where
        K: Into<String>,
        V: Into<Value>;

    /// The value stored under `key`.
    fn retrieve(&self, key: &str) -> Option<Value>;

    /// The value stored under `key`, computing and caching `default` if
    /// there is none.
    ///
    /// A [`Value::Function`] default is invoked once with the object as the
    /// receiver and its result is cached; any other default is cached as
    /// is. A `Null` default behaves like [`Store::retrieve`] and yields
    /// `Null` when nothing is stored.
    fn retrieve_or(&self, key: &str, default: impl Into<Value>) -> Result<Value, RuntimeError>;

    /// Like [`Store::retrieve_or`] with a native closure as the default.
    fn retrieve_or_else(&self, key: &str, default: impl FnOnce() -> Value) -> Value;

    /// Remove and return the value under `key`.
    fn dump(&self, key: &str) -> Option<Value>;

    /// Remove every key and return the removed values together, keyed by
    /// the requested names in request order. Keys with nothing stored map
    /// to `Null`.
    fn dump_all<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> Map;

    /// The storage slot, if anything has been stored yet.
    fn storage(&self) -> Option<Rc<Storage>>;
}

impl Store for Object {
    fn store(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.slot::<Storage>().insert(key.into(), value.into());
        self
    }

    fn store_all<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> &Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let storage = self.slot::<Storage>();
        for (key, value) in pairs {
            storage.insert(key.into(), value.into());
        }
        self
    }

    fn retrieve(&self, key: &str) -> Option<Value> {
        self.existing_slot::<Storage>()?.get(key)
    }

    fn retrieve_or(&self, key: &str, default: impl Into<Value>) -> Result<Value, RuntimeError> {
        let default = default.into();
        if let Some(value) = self.retrieve(key) {
            return Ok(value);
        }
        let computed = match default {
            Value::Null => return Ok(Value::Null),
            Value::Function(factory) => compute(self, key, &factory)?,
            other => other,
        };
        self.store(key, computed.clone());
        Ok(computed)
    }

    fn retrieve_or_else(&self, key: &str, default: impl FnOnce() -> Value) -> Value {
        if let Some(value) = self.retrieve(key) {
            return value;
        }
        let computed = default();
        self.store(key, computed.clone());
        computed
    }

    fn dump(&self, key: &str) -> Option<Value> {
        self.existing_slot::<Storage>()?.remove(key)
    }

    fn dump_all<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> Map {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), self.dump(key).unwrap_or_default())
            })
            .collect()
    }

    fn storage(&self) -> Option<Rc<Storage>> {
        self.existing_slot::<Storage>()
    }
}

fn compute(object: &Object, key: &str, factory: &Function) -> Result<Value, RuntimeError> {
    tracing::trace!(object = %object.id(), key, "storage.default");
    factory.call(object, &[])
}
