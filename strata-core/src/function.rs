//! Callable values.

use crate::class::Class;
use crate::error::RuntimeError;
use crate::object::Object;
use crate::value::Value;
use crate::wrap::Wrapper;
use std::fmt;
use std::rc::Rc;

/// Signature of a native method body: receiver plus positional arguments.
pub type NativeFn = dyn Fn(&Object, &[Value]) -> Result<Value, RuntimeError>;

/// A shared callable.
///
/// Cloning a `Function` clones the handle; [`Function::ptr_eq`] compares
/// identity, which is what registries and listener lists deduplicate on.
#[derive(Clone)]
pub struct Function(Rc<FunctionInner>);

struct FunctionInner {
    body: Body,
    protected: bool,
    hidden: bool,
}

enum Body {
    Native(Rc<NativeFn>),
    Wrapped(Wrapper),
}

impl Function {
    /// Create a function from a native closure.
    pub fn new(f: impl Fn(&Object, &[Value]) -> Result<Value, RuntimeError> + 'static) -> Self {
        Self::from_parts(Body::Native(Rc::new(f)), false, false)
    }

    /// Create a protected function: callable only from inside another
    /// method running on the same instance.
    pub fn protected(
        f: impl Fn(&Object, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self::new(f).protect()
    }

    /// Return a protected copy of this function. The copy has a new identity.
    pub fn protect(self) -> Self {
        Self::from_parts(self.body_clone(), true, self.0.hidden)
    }

    /// Return a hidden copy of this function. Hidden functions are skipped
    /// by `Class::implement`, so they never become class members through
    /// the default merge.
    pub fn hide(self) -> Self {
        Self::from_parts(self.body_clone(), self.0.protected, true)
    }

    pub(crate) fn wrapped(wrapper: Wrapper, protected: bool) -> Self {
        Self::from_parts(Body::Wrapped(wrapper), protected, false)
    }

    fn from_parts(body: Body, protected: bool, hidden: bool) -> Self {
        Self(Rc::new(FunctionInner {
            body,
            protected,
            hidden,
        }))
    }

    fn body_clone(&self) -> Body {
        match &self.0.body {
            Body::Native(f) => Body::Native(Rc::clone(f)),
            Body::Wrapped(w) => Body::Wrapped(w.clone()),
        }
    }

    /// Whether this function is protected.
    pub fn is_protected(&self) -> bool {
        self.0.protected
    }

    /// Whether this function is hidden from `implement`.
    pub fn is_hidden(&self) -> bool {
        self.0.hidden
    }

    /// Whether this function is a method trampoline installed by a class.
    pub fn is_wrapped(&self) -> bool {
        matches!(self.0.body, Body::Wrapped(_))
    }

    /// The unwrapped function behind a trampoline, or `self` for a plain
    /// function.
    pub fn origin(&self) -> Function {
        match &self.0.body {
            Body::Wrapped(w) => w.origin().clone(),
            Body::Native(_) => self.clone(),
        }
    }

    /// The class that installed this trampoline, if it is one and the class
    /// is still alive.
    pub fn owner(&self) -> Option<Class> {
        match &self.0.body {
            Body::Wrapped(w) => w.owner(),
            Body::Native(_) => None,
        }
    }

    /// The member name a trampoline was installed under.
    pub fn member_name(&self) -> Option<&str> {
        match &self.0.body {
            Body::Wrapped(w) => Some(w.name()),
            Body::Native(_) => None,
        }
    }

    /// Invoke with `this` as the receiver.
    ///
    /// A protected function fails with [`RuntimeError::ProtectedAccess`]
    /// unless a method is already running on `this`.
    pub fn call(&self, this: &Object, args: &[Value]) -> Result<Value, RuntimeError> {
        self.call_as(self.member_name().unwrap_or("anonymous"), this, args)
    }

    /// [`Function::call`] reporting `member` in access errors.
    pub(crate) fn call_as(
        &self,
        member: &str,
        this: &Object,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        match &self.0.body {
            Body::Native(f) => {
                if self.0.protected && !this.has_caller() {
                    return Err(RuntimeError::ProtectedAccess {
                        method: member.to_string(),
                    });
                }
                f(this, args)
            }
            Body::Wrapped(w) => w.invoke(this, args, self.0.protected),
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.body {
            Body::Native(_) => write!(f, "Function({:p})", Rc::as_ptr(&self.0)),
            Body::Wrapped(w) => write!(f, "Method({})", w.name()),
        }
    }
}
