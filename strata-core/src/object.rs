//! Live object instances.

use crate::class::{Class, ClassInner};
use crate::error::RuntimeError;
use crate::id::ObjectId;
use crate::value::{Map, Value};
use crate::wrap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// A shared handle to an object instance.
///
/// An object has its own fields, an optional class whose prototype
/// supplies every member the object does not hold itself, a caller-frame
/// stack maintained by method trampolines, and lazily created capability
/// slots (event registry, observer lists, storage) keyed by type.
///
/// Cloning an `Object` clones the handle; [`Object::ptr_eq`] compares
/// identity.
#[derive(Clone)]
pub struct Object(Rc<ObjectInner>);

struct ObjectInner {
    id: ObjectId,
    class: Option<Class>,
    fields: RefCell<Map>,
    frames: RefCell<Vec<Frame>>,
    slots: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

/// One entry of the caller stack: the member that is running and the
/// class whose trampoline entered it.
pub(crate) struct Frame {
    name: Rc<str>,
    owner: Weak<ClassInner>,
}

impl Frame {
    pub(crate) fn new(name: Rc<str>, owner: Weak<ClassInner>) -> Self {
        Self { name, owner }
    }
}

/// Pops the frame it pushed when dropped, on success and error alike.
pub(crate) struct FrameGuard<'a> {
    object: &'a Object,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.object.0.frames.borrow_mut().pop();
    }
}

impl Object {
    /// Create a plain object with no class.
    pub fn new() -> Self {
        Self::from_parts(None, Map::new())
    }

    /// Create a plain object holding `fields`.
    pub fn with_fields(fields: Map) -> Self {
        Self::from_parts(None, fields)
    }

    pub(crate) fn of_class(class: Class) -> Self {
        Self::from_parts(Some(class), Map::new())
    }

    fn from_parts(class: Option<Class>, fields: Map) -> Self {
        Self(Rc::new(ObjectInner {
            id: ObjectId::next(),
            class,
            fields: RefCell::new(fields),
            frames: RefCell::new(Vec::new()),
            slots: RefCell::new(HashMap::new()),
        }))
    }

    /// This object's process-unique id.
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    /// The class this object was constructed from.
    pub fn class(&self) -> Option<&Class> {
        self.0.class.as_ref()
    }

    /// Whether this object's class is `class` or one of its descendants.
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class()
            .is_some_and(|own| own.ptr_eq(class) || own.is_subclass_of(class))
    }

    /// Read a member: the object's own field if present, otherwise the
    /// class prototype's default.
    pub fn get(&self, key: &str) -> Option<Value> {
        let own = self.0.fields.borrow().get(key).cloned();
        own.or_else(|| self.class().and_then(|class| class.lookup(key)))
    }

    /// Whether the object or its class has member `key`.
    pub fn has(&self, key: &str) -> bool {
        self.0.fields.borrow().contains_key(key)
            || self.class().is_some_and(|class| class.lookup(key).is_some())
    }

    /// Assign an own field.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.0.fields.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Assign every pair as an own field, in iteration order.
    pub fn set_all<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> &Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.0.fields.borrow_mut().insert(key.into(), value.into());
        }
        self
    }

    /// Remove an own field, returning it. The prototype default, if any,
    /// becomes visible again.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.fields.borrow_mut().shift_remove(key)
    }

    /// Mutate member `key` in place.
    ///
    /// A member that only exists on the prototype is copied into the
    /// object's own fields first, so the class default is never touched.
    /// A missing member starts out as [`Value::Null`].
    pub fn update<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> R {
        let own = self.0.fields.borrow().get(key).cloned();
        let mut value = match own {
            Some(own) => own,
            None => self
                .class()
                .and_then(|class| class.lookup(key))
                .unwrap_or_default(),
        };
        let result = f(&mut value);
        let mut fields = self.0.fields.borrow_mut();
        match fields.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                fields.insert(key.to_string(), value);
            }
        }
        result
    }

    /// Snapshot of this object's own fields.
    pub fn fields(&self) -> Map {
        self.0.fields.borrow().clone()
    }

    /// Flattened view of every member: prototype defaults overlaid with
    /// the object's own fields.
    pub fn members(&self) -> Map {
        let mut members = self.class().map(Class::prototype).unwrap_or_default();
        for (key, value) in self.0.fields.borrow().iter() {
            members.insert(key.clone(), value.clone());
        }
        members
    }

    /// Invoke member `name` with this object as the receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        match self.get(name) {
            Some(Value::Function(f)) => f.call_as(name, self, args),
            Some(other) => Err(RuntimeError::NotCallable {
                member: name.to_string(),
                found: other.kind(),
            }),
            None => Err(RuntimeError::MissingMember {
                member: name.to_string(),
            }),
        }
    }

    /// Run the nearest ancestor implementation of the member currently
    /// executing, with the same receiver and the given arguments.
    ///
    /// Fails with [`RuntimeError::ProtectedAccess`] when called from
    /// outside any method, and with
    /// [`RuntimeError::NoParentImplementation`] when no ancestor defines
    /// the member.
    pub fn parent(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        wrap::call_parent(self, args)
    }

    /// The member currently executing on this object, if any.
    pub fn caller(&self) -> Option<String> {
        self.0
            .frames
            .borrow()
            .last()
            .map(|frame| frame.name.to_string())
    }

    /// The member that called the currently executing one, if any.
    pub fn previous_caller(&self) -> Option<String> {
        let frames = self.0.frames.borrow();
        frames
            .len()
            .checked_sub(2)
            .map(|index| frames[index].name.to_string())
    }

    pub(crate) fn has_caller(&self) -> bool {
        !self.0.frames.borrow().is_empty()
    }

    pub(crate) fn current_frame(&self) -> Option<(Rc<str>, Weak<ClassInner>)> {
        self.0
            .frames
            .borrow()
            .last()
            .map(|frame| (Rc::clone(&frame.name), frame.owner.clone()))
    }

    pub(crate) fn enter(&self, frame: Frame) -> FrameGuard<'_> {
        self.0.frames.borrow_mut().push(frame);
        FrameGuard { object: self }
    }

    pub(crate) fn clear_fields(&self, keys: impl IntoIterator<Item = String>) {
        let mut fields = self.0.fields.borrow_mut();
        for key in keys {
            fields.shift_remove(&key);
        }
    }

    /// The capability slot of type `T`, created with `T::default()` on
    /// first access.
    ///
    /// Slots are how capabilities attach per-object state lazily without
    /// the object knowing about them: the event registry, observer lists
    /// and storage each live in their own slot type.
    pub fn slot<T: Default + 'static>(&self) -> Rc<T> {
        let id = TypeId::of::<T>();
        if let Some(existing) = self.0.slots.borrow().get(&id) {
            if let Ok(slot) = Rc::clone(existing).downcast::<T>() {
                return slot;
            }
        }
        let slot = Rc::new(T::default());
        self.0
            .slots
            .borrow_mut()
            .insert(id, Rc::clone(&slot) as Rc<dyn Any>);
        slot
    }

    /// The capability slot of type `T`, if it has been created.
    pub fn existing_slot<T: 'static>(&self) -> Option<Rc<T>> {
        let existing = self.0.slots.borrow().get(&TypeId::of::<T>()).cloned()?;
        existing.downcast::<T>().ok()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class() {
            Some(class) => write!(f, "Object({} {})", class, self.0.id),
            None => write!(f, "Object({})", self.0.id),
        }
    }
}
