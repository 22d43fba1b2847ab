//! The class factory.
//!
//! [`Class::define`] compiles a [`Descriptor`] into a class. Every
//! descriptor entry goes through [`Class::implement`]: keys with a
//! registered mutator (`Extends`, `Implements`, or anything added through
//! [`mutator::register`]) are handed to the mutator; everything else is
//! merged into the class prototype by shape.

use crate::descriptor::Descriptor;
use crate::error::RuntimeError;
use crate::id::ClassName;
use crate::mutator::{self, EXTENDS};
use crate::object::{Frame, Object};
use crate::value::{Map, Value, merge_into};
use crate::wrap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Member name of the initializer run by [`Class::construct`].
pub const INITIALIZE: &str = "initialize";

/// Caller marker active while the initializer runs.
pub const CONSTRUCTOR: &str = "constructor";

/// A compiled class.
///
/// Holds the prototype (the template of default member values every
/// instance reads through) and an optional parent class. Cloning a
/// `Class` clones the handle; [`Class::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct Class(Rc<ClassInner>);

pub(crate) struct ClassInner {
    name: Option<ClassName>,
    parent: RefCell<Option<Class>>,
    prototype: RefCell<Map>,
}

impl Class {
    /// Compile a descriptor into a class.
    ///
    /// `Extends` is applied before every other entry so the inherited
    /// prototype is in place when the remaining members are merged over
    /// it; the other entries are applied in descriptor order.
    pub fn define(descriptor: impl Into<Descriptor>) -> Result<Class, RuntimeError> {
        let (name, mut members) = descriptor.into().into_parts();
        let class = Class(Rc::new(ClassInner {
            name,
            parent: RefCell::new(None),
            prototype: RefCell::new(Map::new()),
        }));

        if let Some(parent) = members.shift_remove(EXTENDS) {
            class.implement(EXTENDS, parent)?;
        }
        for (key, value) in members {
            class.implement(&key, value)?;
        }

        tracing::debug!(
            class = %class,
            parent = ?class.parent().map(|p| p.to_string()),
            members = class.0.prototype.borrow().len(),
            "class.define"
        );
        Ok(class)
    }

    /// The class name given in the descriptor.
    pub fn name(&self) -> Option<&ClassName> {
        self.0.name.as_ref()
    }

    /// The class recorded by `Extends`.
    pub fn parent(&self) -> Option<Class> {
        self.0.parent.borrow().clone()
    }

    /// Whether `ancestor` appears anywhere up this class's parent chain.
    pub fn is_subclass_of(&self, ancestor: &Class) -> bool {
        let mut current = self.parent();
        while let Some(class) = current {
            if class.ptr_eq(ancestor) {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// A prototype member by name.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.0.prototype.borrow().get(key).cloned()
    }

    /// Snapshot of the whole prototype.
    pub fn prototype(&self) -> Map {
        self.0.prototype.borrow().clone()
    }

    /// Add or merge one member.
    ///
    /// A registered mutator for `key` runs first; if it yields `None` the
    /// default merge is skipped, otherwise the value it yields is merged.
    /// The default merge dispatches on shape:
    ///
    /// - function: installed as a trampoline owned by this class, unless hidden
    /// - mapping: deep-merged into an existing mapping at `key`, else inserted
    /// - anything else: assigned
    pub fn implement(&self, key: &str, value: impl Into<Value>) -> Result<(), RuntimeError> {
        let mut value = value.into();
        if let Some(mutator) = mutator::lookup(key) {
            tracing::trace!(class = %self, mutator = key, "class.mutate");
            match mutator(self, value)? {
                Some(rest) => value = rest,
                None => return Ok(()),
            }
        }

        let mut prototype = self.0.prototype.borrow_mut();
        match value {
            Value::Function(f) => {
                if f.is_hidden() {
                    return Ok(());
                }
                prototype.insert(key.to_string(), Value::Function(wrap::wrap(key, f.origin(), self)));
            }
            Value::Map(incoming) => {
                if let Some(Value::Map(existing)) = prototype.get_mut(key) {
                    merge_into(existing, incoming);
                } else {
                    prototype.insert(key.to_string(), Value::Map(incoming));
                }
            }
            other => {
                prototype.insert(key.to_string(), other);
            }
        }
        Ok(())
    }

    /// [`Class::implement`] every pair, in iteration order.
    pub fn implement_all<K, V>(
        &self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), RuntimeError>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.implement(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Construct an instance: isolate container fields, then run the
    /// initializer with `args` under the `"constructor"` caller marker.
    ///
    /// If the initializer returns an object, that object is the result;
    /// otherwise the fresh instance is.
    pub fn construct(&self, args: &[Value]) -> Result<Object, RuntimeError> {
        let instance = self.get_prototype();
        let returned = {
            let _frame = instance.enter(Frame::new(Rc::from(CONSTRUCTOR), self.downgrade()));
            match self.lookup(INITIALIZE) {
                Some(Value::Function(init)) => init.call(&instance, args)?,
                _ => Value::Null,
            }
        };

        tracing::trace!(class = %self, object = %instance.id(), "class.construct");
        match returned {
            Value::Object(replacement) => Ok(replacement),
            _ => Ok(instance),
        }
    }

    /// Build a template instance without running the initializer.
    ///
    /// This is the prototyping entry point: the result carries the class's
    /// composed defaults with containers already isolated, and is what
    /// `Extends` and `Implements` read from another class.
    pub fn get_prototype(&self) -> Object {
        let instance = Object::of_class(self.clone());
        Class::reset(&instance);
        instance
    }

    /// Give `instance` a private working copy of every container default.
    ///
    /// Own fields shadowing prototype members are dropped; mappings and
    /// sequences from the prototype are deep-cloned into own fields, so
    /// mutating one instance's nested data never reaches another
    /// instance or the class. Scalars stay on the prototype.
    pub fn reset(instance: &Object) {
        let Some(class) = instance.class() else {
            return;
        };
        let prototype = class.prototype();
        instance.clear_fields(prototype.keys().cloned());
        instance.set_all(
            prototype
                .into_iter()
                .filter(|(_, value)| value.is_container()),
        );
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn set_parent(&self, parent: Class) {
        *self.0.parent.borrow_mut() = Some(parent);
    }

    pub(crate) fn replace_prototype(&self, prototype: Map) -> Map {
        std::mem::replace(&mut *self.0.prototype.borrow_mut(), prototype)
    }

    pub(crate) fn downgrade(&self) -> Weak<ClassInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(weak: &Weak<ClassInner>) -> Option<Class> {
        weak.upgrade().map(Class)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "<anonymous {:p}>", Rc::as_ptr(&self.0)),
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({self})")
    }
}
