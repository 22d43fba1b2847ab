//! Method trampolines and `parent()` resolution.
//!
//! Every function-typed class member is installed as a trampoline that
//! pushes a caller frame `(member, owner)` on the receiver for the
//! duration of the call. The frame stack gates protected members (an
//! empty stack means "called from outside") and tells `parent()` which
//! member is executing and which class's ancestor to search.

use crate::class::{Class, ClassInner};
use crate::error::RuntimeError;
use crate::function::Function;
use crate::object::{Frame, Object};
use crate::value::Value;
use std::rc::{Rc, Weak};

/// Metadata carried by a trampoline.
#[derive(Clone)]
pub(crate) struct Wrapper {
    name: Rc<str>,
    owner: Weak<ClassInner>,
    origin: Function,
}

/// Wrap `origin` as member `name` of `owner`.
///
/// The trampoline inherits the protected flag of `origin`.
pub(crate) fn wrap(name: &str, origin: Function, owner: &Class) -> Function {
    let protected = origin.is_protected();
    Function::wrapped(
        Wrapper {
            name: Rc::from(name),
            owner: owner.downgrade(),
            origin,
        },
        protected,
    )
}

impl Wrapper {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn origin(&self) -> &Function {
        &self.origin
    }

    pub(crate) fn owner(&self) -> Option<Class> {
        Class::upgrade(&self.owner)
    }

    pub(crate) fn invoke(
        &self,
        this: &Object,
        args: &[Value],
        protected: bool,
    ) -> Result<Value, RuntimeError> {
        if protected && !this.has_caller() {
            return Err(RuntimeError::ProtectedAccess {
                method: self.name.to_string(),
            });
        }
        tracing::trace!(object = %this.id(), method = %self.name, "method.enter");
        let _frame = this.enter(Frame::new(Rc::clone(&self.name), self.owner.clone()));
        self.origin.call(this, args)
    }
}

/// Run the nearest ancestor implementation of the member currently
/// executing on `this`.
///
/// The ancestor is searched from the parent of the class that owns the
/// running trampoline, not from the instance's own class, so a method
/// inherited unchanged from `A` into `C` resolves `parent()` against
/// `A`'s parent. The ancestor body runs under its own trampoline, which
/// pushes a frame owned by the ancestor class; nested `parent()` calls
/// therefore keep walking upward and the frame is popped on every exit.
pub(crate) fn call_parent(this: &Object, args: &[Value]) -> Result<Value, RuntimeError> {
    let Some((method, owner)) = this.current_frame() else {
        return Err(RuntimeError::ProtectedAccess {
            method: "parent".to_string(),
        });
    };
    let no_parent = || RuntimeError::NoParentImplementation {
        method: method.to_string(),
    };

    let owner = Class::upgrade(&owner).ok_or_else(no_parent)?;
    let ancestor = owner.parent().ok_or_else(no_parent)?;
    let implementation = match ancestor.lookup(&method) {
        Some(Value::Function(f)) => f,
        _ => return Err(no_parent()),
    };

    tracing::trace!(
        object = %this.id(),
        method = %method,
        from = %owner,
        to = %ancestor,
        "parent.resolve"
    );
    implementation.call(this, args)
}

/// The hidden `parent` member `Extends` installs on a prototype.
pub(crate) fn parent_member() -> Function {
    Function::new(|this, args| this.parent(args)).hide()
}
