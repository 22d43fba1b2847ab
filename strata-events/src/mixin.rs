//! Capability classes for composition with `Implements`.
//!
//! Each function returns a fresh class whose members bridge dynamic
//! calls to the typed [`Events`] and [`Store`] APIs:
//!
//! ```
//! use strata_core::{Class, Descriptor, Function, Value};
//! use strata_events::mixin;
//!
//! let widget = Class::define(
//!     Descriptor::named("Widget").implements([mixin::events().unwrap()]),
//! )
//! .unwrap();
//!
//! let w = widget.construct(&[]).unwrap();
//! let handler = Function::new(|this, _| {
//!     this.set("fired", true);
//!     Ok(Value::Null)
//! });
//! w.call("listen", &["ping".into(), handler.into()]).unwrap();
//! w.call("fire", &["ping".into()]).unwrap();
//! assert_eq!(w.get("fired"), Some(Value::Bool(true)));
//! ```

use crate::registry::Events;
use crate::storage::Store;
use strata_core::{Class, Descriptor, Function, Map, RuntimeError, Value};

/// A class exposing `listen`, `ignore` and `fire` as members.
///
/// - `listen(type, fn)` or `listen({type: fn, ...})`
/// - `ignore()`, `ignore(type)` or `ignore(type, fn)`
/// - `fire(type, ...args)`
///
/// Every member returns the receiver.
pub fn events() -> Result<Class, RuntimeError> {
    Class::define(
        Descriptor::named("Events")
            .method("listen", |this, args| {
                match args.first() {
                    Some(Value::Map(pairs)) => {
                        let pairs = functions_of("listen", pairs)?;
                        this.listen_all(pairs);
                    }
                    _ => {
                        let ty = string_arg("listen", args, 0)?;
                        let handler = function_arg("listen", args, 1)?;
                        this.listen(ty, handler);
                    }
                }
                Ok(Value::Object(this.clone()))
            })
            .method("ignore", |this, args| {
                match (non_null(args, 0), non_null(args, 1)) {
                    (None, _) => {
                        this.ignore_all();
                    }
                    (Some(_), None) => {
                        this.ignore_type(string_arg("ignore", args, 0)?);
                    }
                    (Some(_), Some(_)) => {
                        let ty = string_arg("ignore", args, 0)?;
                        let handler = function_arg("ignore", args, 1)?;
                        this.ignore(ty, &handler);
                    }
                }
                Ok(Value::Object(this.clone()))
            })
            .method("fire", |this, args| {
                let ty = string_arg("fire", args, 0)?;
                this.fire(ty, &args[1..])?;
                Ok(Value::Object(this.clone()))
            }),
    )
}

/// A class exposing `store`, `retrieve` and `dump` as members.
///
/// - `store(key, value)` or `store({key: value, ...})`, returns the receiver
/// - `retrieve(key)` or `retrieve(key, default)`, where a function default
///   is invoked once and cached; a missing entry is `null`
/// - `dump(key)` returns the removed value; `dump(k1, k2, ...)` or
///   `dump([k1, k2, ...])` returns a map of the removed values
pub fn storage() -> Result<Class, RuntimeError> {
    Class::define(
        Descriptor::named("Storage")
            .method("store", |this, args| {
                match args.first() {
                    Some(Value::Map(pairs)) => {
                        this.store_all(pairs.clone());
                    }
                    _ => {
                        let key = string_arg("store", args, 0)?;
                        this.store(key, args.get(1).cloned().unwrap_or_default());
                    }
                }
                Ok(Value::Object(this.clone()))
            })
            .method("retrieve", |this, args| {
                let key = string_arg("retrieve", args, 0)?;
                this.retrieve_or(key, args.get(1).cloned().unwrap_or_default())
            })
            .method("dump", |this, args| match args {
                [Value::Array(keys)] => {
                    let keys = strings_of("dump", keys)?;
                    Ok(Value::Map(this.dump_all(keys)))
                }
                [_] => {
                    let key = string_arg("dump", args, 0)?;
                    Ok(this.dump(key).unwrap_or_default())
                }
                _ => {
                    let keys = strings_of("dump", args)?;
                    Ok(Value::Map(this.dump_all(keys)))
                }
            }),
    )
}

fn non_null(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index).filter(|value| !value.is_null())
}

fn string_arg<'a>(method: &str, args: &'a [Value], index: usize) -> Result<&'a str, RuntimeError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(method, index, "a string"))
}

fn function_arg(method: &str, args: &[Value], index: usize) -> Result<Function, RuntimeError> {
    args.get(index)
        .and_then(Value::as_function)
        .cloned()
        .ok_or_else(|| invalid(method, index, "a function"))
}

fn functions_of(method: &str, pairs: &Map) -> Result<Vec<(String, Function)>, RuntimeError> {
    pairs
        .iter()
        .map(|(ty, value)| match value {
            Value::Function(handler) => Ok((ty.clone(), handler.clone())),
            _ => Err(invalid(method, 0, "a map of functions")),
        })
        .collect()
}

fn strings_of<'a>(method: &str, values: &'a [Value]) -> Result<Vec<&'a str>, RuntimeError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| value.as_str().ok_or_else(|| invalid(method, index, "a string")))
        .collect()
}

fn invalid(method: &str, index: usize, expected: &'static str) -> RuntimeError {
    RuntimeError::InvalidArgument {
        method: method.to_string(),
        index,
        expected,
    }
}

