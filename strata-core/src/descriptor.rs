//! Class descriptors.

use crate::class::{Class, INITIALIZE};
use crate::error::RuntimeError;
use crate::function::Function;
use crate::id::ClassName;
use crate::mutator::{EXTENDS, IMPLEMENTS};
use crate::object::Object;
use crate::value::{Map, Value};

/// The flat member table a class is compiled from.
///
/// Keys are applied in insertion order (with `Extends` hoisted to the
/// front by [`Class::define`]). Setting a key twice keeps the first
/// position and the last value.
///
/// ```
/// use strata_core::{Class, Descriptor, Value};
///
/// let counter = Class::define(
///     Descriptor::named("Counter")
///         .member("count", 0)
///         .method("bump", |this, _args| {
///             let next = this.get("count").and_then(|v| v.as_f64()).unwrap_or(0.0) + 1.0;
///             this.set("count", next);
///             Ok(Value::Number(next))
///         }),
/// )
/// .unwrap();
///
/// let c = counter.construct(&[]).unwrap();
/// assert_eq!(c.call("bump", &[]).unwrap(), Value::Number(1.0));
/// ```
#[derive(Clone, Default, Debug)]
pub struct Descriptor {
    name: Option<ClassName>,
    members: Map,
}

impl Descriptor {
    /// An empty, anonymous descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty descriptor for a class called `name`.
    pub fn named(name: impl Into<ClassName>) -> Self {
        Self {
            name: Some(name.into()),
            members: Map::new(),
        }
    }

    /// Set any member, including mutator keys.
    pub fn member(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(key.into(), value.into());
        self
    }

    /// Inherit from `parent`.
    pub fn extends(self, parent: &Class) -> Self {
        self.member(EXTENDS, parent)
    }

    /// Mix in classes and/or mappings, in order.
    pub fn implements<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        self.member(IMPLEMENTS, items)
    }

    /// Set the initializer run by [`Class::construct`].
    pub fn initialize(
        self,
        f: impl Fn(&Object, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.member(INITIALIZE, Function::new(f))
    }

    /// Add a public method.
    pub fn method(
        self,
        name: impl Into<String>,
        f: impl Fn(&Object, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.member(name, Function::new(f))
    }

    /// Add a protected method.
    pub fn protected(
        self,
        name: impl Into<String>,
        f: impl Fn(&Object, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        self.member(name, Function::protected(f))
    }

    /// The class name, if any.
    pub fn name(&self) -> Option<&ClassName> {
        self.name.as_ref()
    }

    /// The members in application order.
    pub fn members(&self) -> &Map {
        &self.members
    }

    pub(crate) fn into_parts(self) -> (Option<ClassName>, Map) {
        (self.name, self.members)
    }
}

/// A bare function is shorthand for `{ initialize: f }`.
impl From<Function> for Descriptor {
    fn from(initialize: Function) -> Self {
        Descriptor::new().member(INITIALIZE, initialize)
    }
}

impl From<Map> for Descriptor {
    fn from(members: Map) -> Self {
        Self {
            name: None,
            members,
        }
    }
}
