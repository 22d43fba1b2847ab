//! CallLog — records every invocation of the functions it hands out.

use crate::function::Function;
use crate::object::Object;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The label of the function that ran.
    pub label: String,
    /// The receiver it ran with.
    pub receiver: Object,
    /// The arguments it received.
    pub args: Vec<Value>,
}

/// A shared log of function invocations.
///
/// Clones share the same log, so a test can hand a recorder to a class or
/// registry and keep its own handle for assertions.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<RecordedCall>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A function that appends a [`RecordedCall`] under `label` and
    /// returns [`Value::Null`].
    pub fn recorder(&self, label: impl Into<String>) -> Function {
        let label = label.into();
        let calls = Rc::clone(&self.calls);
        Function::new(move |this, args| {
            calls.borrow_mut().push(RecordedCall {
                label: label.clone(),
                receiver: this.clone(),
                args: args.to_vec(),
            });
            Ok(Value::Null)
        })
    }

    /// Append an entry by hand (for closures that do more than record).
    pub fn push(&self, label: impl Into<String>, receiver: &Object, args: &[Value]) {
        self.calls.borrow_mut().push(RecordedCall {
            label: label.into(),
            receiver: receiver.clone(),
            args: args.to_vec(),
        });
    }

    /// Labels in invocation order.
    pub fn labels(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.label.clone())
            .collect()
    }

    /// Snapshot of every recorded call.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}
