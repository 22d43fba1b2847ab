//! Class factory, method wrapper and mutator tests.
//!
//! Tests cover:
//! - Overriding and `parent()` resolution through multi-level chains
//! - Protected members and the caller marker
//! - Construction lifecycle and initializer return values
//! - Instance isolation of container defaults
//! - `Implements` composition and the default merge rules
//! - Runtime mutator registration

use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use strata_core::*;

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// A class `name` whose method `m` returns `name` followed by whatever its
/// parent returns (or just `name` when `chain` is false).
fn layered(name: &'static str, parent: Option<&Class>, chain: bool) -> Class {
    let mut descriptor = Descriptor::named(name).method("m", move |this, args| {
        if chain {
            let up = this.parent(args)?;
            Ok(Value::from(format!("{name}{}", text(&up))))
        } else {
            Ok(Value::from(name))
        }
    });
    if let Some(parent) = parent {
        descriptor = descriptor.extends(parent);
    }
    Class::define(descriptor).unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Overriding and parent()
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn override_runs_child_and_parent_runs_ancestor_with_same_args_and_receiver() {
    let seen: Rc<RefCell<Vec<(String, Object)>>> = Rc::default();

    let seen_a = Rc::clone(&seen);
    let a = Class::define(Descriptor::named("A").method("greet", move |this, args| {
        seen_a.borrow_mut().push(("A".into(), this.clone()));
        Ok(Value::from(format!("A:{}", text(&args[0]))))
    }))
    .unwrap();

    let seen_b = Rc::clone(&seen);
    let b = Class::define(Descriptor::named("B").extends(&a).method(
        "greet",
        move |this, args| {
            seen_b.borrow_mut().push(("B".into(), this.clone()));
            let up = this.parent(args)?;
            Ok(Value::from(format!("B>{}", text(&up))))
        },
    ))
    .unwrap();

    let obj = b.construct(&[]).unwrap();
    let result = obj.call("greet", &["x".into()]).unwrap();
    assert_eq!(result, Value::from("B>A:x"));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "B");
    assert_eq!(seen[1].0, "A");
    assert!(seen[0].1.ptr_eq(&obj));
    assert!(seen[1].1.ptr_eq(&obj));
}

#[test]
fn parent_walks_three_levels() {
    let a = layered("A", None, false);
    let b = layered("B", Some(&a), true);
    let c = layered("C", Some(&b), true);

    let obj = c.construct(&[]).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), Value::from("CBA"));
}

#[test]
fn parent_skips_ancestor_that_only_inherits_the_member() {
    let a = layered("A", None, false);
    let b = Class::define(Descriptor::named("B").extends(&a)).unwrap();
    let c = layered("C", Some(&b), true);

    let obj = c.construct(&[]).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), Value::from("CA"));
}

#[test]
fn inherited_method_resolves_parent_from_its_owner() {
    let a = layered("A", None, false);
    let b = layered("B", Some(&a), true);
    // C inherits B.m unchanged; B.m's parent() must reach A, not B again.
    let c = Class::define(Descriptor::named("C").extends(&b)).unwrap();

    let obj = c.construct(&[]).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), Value::from("BA"));
}

#[test]
fn parent_without_ancestor_implementation_fails() {
    let lonely = layered("Lonely", None, true);
    let obj = lonely.construct(&[]).unwrap();
    let err = obj.call("m", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::NoParentImplementation { ref method } if method == "m"));

    let base = Class::define(Descriptor::named("Base")).unwrap();
    let child = layered("Child", Some(&base), true);
    let obj = child.construct(&[]).unwrap();
    let err = obj.call("m", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::NoParentImplementation { .. }));
}

#[test]
fn parent_outside_any_method_is_protected_access() {
    let a = layered("A", None, false);
    let b = layered("B", Some(&a), true);
    let obj = b.construct(&[]).unwrap();

    let err = obj.parent(&[]).unwrap_err();
    assert!(matches!(err, RuntimeError::ProtectedAccess { .. }));
}

#[test]
fn extends_installs_hidden_parent_member() {
    let a = layered("A", None, false);
    let b = Class::define(Descriptor::named("B").extends(&a).method("m", |this, args| {
        // Reaching parent through the member works like Object::parent.
        this.call(PARENT, args)
    }))
    .unwrap();

    let parent = b.lookup(PARENT).unwrap();
    assert!(parent.as_function().unwrap().is_hidden());

    let obj = b.construct(&[]).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), Value::from("A"));
}

#[test]
fn extends_is_applied_before_members_declared_earlier() {
    let a = layered("A", None, false);
    let b = Class::define(
        Descriptor::named("B")
            .method("m", |_, _| Ok(Value::from("B")))
            .extends(&a),
    )
    .unwrap();

    let obj = b.construct(&[]).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), Value::from("B"));
    assert!(b.parent().unwrap().ptr_eq(&a));
}

#[test]
fn late_extends_keeps_members_already_implemented() {
    let a = Class::define(
        Descriptor::named("A")
            .method("m", |_, _| Ok(Value::from("A.m")))
            .method("n", |_, _| Ok(Value::from("A.n"))),
    )
    .unwrap();
    let b = Class::define(Descriptor::named("B").method("m", |_, _| Ok(Value::from("B.m")))).unwrap();

    b.implement(EXTENDS, &a).unwrap();

    let obj = b.construct(&[]).unwrap();
    assert_eq!(obj.call("m", &[]).unwrap(), Value::from("B.m"));
    assert_eq!(obj.call("n", &[]).unwrap(), Value::from("A.n"));
}

#[test]
fn late_extends_merges_mapping_members() {
    let a = Class::define(Descriptor::named("A").member("options", json!({"a": 1, "b": 2}))).unwrap();
    let b = Class::define(Descriptor::named("B").member("options", json!({"b": 3}))).unwrap();

    b.implement(EXTENDS, &a).unwrap();

    assert_eq!(b.lookup("options"), Some(Value::from(json!({"a": 1, "b": 3}))));
    assert_eq!(a.lookup("options"), Some(Value::from(json!({"a": 1, "b": 2}))));
}

#[test]
fn extends_rejects_cycles_and_non_classes() {
    let a = Class::define(Descriptor::named("A")).unwrap();
    let b = Class::define(Descriptor::named("B").extends(&a)).unwrap();

    let err = a.implement(EXTENDS, &b).unwrap_err();
    assert!(matches!(err, RuntimeError::InheritanceCycle { .. }));

    let err = a.implement(EXTENDS, &a).unwrap_err();
    assert!(matches!(err, RuntimeError::InheritanceCycle { .. }));

    let err = Class::define(Descriptor::named("C").member(EXTENDS, 3)).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::InvalidMutatorValue { found: ValueKind::Number, .. }
    ));
}

#[test]
fn subclass_and_instance_introspection() {
    let a = Class::define(Descriptor::named("A")).unwrap();
    let b = Class::define(Descriptor::named("B").extends(&a)).unwrap();
    let c = Class::define(Descriptor::named("C").extends(&b)).unwrap();
    let other = Class::define(Descriptor::named("Other")).unwrap();

    assert!(c.is_subclass_of(&a));
    assert!(!a.is_subclass_of(&c));

    let obj = c.construct(&[]).unwrap();
    assert!(obj.is_instance_of(&c));
    assert!(obj.is_instance_of(&a));
    assert!(!obj.is_instance_of(&other));
    assert!(!Object::new().is_instance_of(&a));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Protected members
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn vault() -> Class {
    Class::define(
        Descriptor::named("Vault")
            .protected("secret", |_, _| Ok(Value::from(42)))
            .method("reveal", |this, _| this.call("secret", &[])),
    )
    .unwrap()
}

#[test]
fn protected_member_refuses_outside_calls() {
    let obj = vault().construct(&[]).unwrap();
    let err = obj.call("secret", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::ProtectedAccess { ref method } if method == "secret"));
}

#[test]
fn protected_member_runs_from_inside_another_method() {
    let obj = vault().construct(&[]).unwrap();
    assert_eq!(obj.call("reveal", &[]).unwrap(), Value::from(42));
}

#[test]
fn protected_flag_survives_inheritance() {
    let child = Class::define(Descriptor::named("Child").extends(&vault())).unwrap();
    let obj = child.construct(&[]).unwrap();
    assert!(obj.call("secret", &[]).is_err());
    assert_eq!(obj.call("reveal", &[]).unwrap(), Value::from(42));
}

#[test]
fn protected_own_field_refuses_outside_calls() {
    let obj = Object::new();
    let secret = Function::protected(|_, _| Ok(Value::from("hidden")));
    obj.set("secret", secret.clone());

    let err = obj.call("secret", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::ProtectedAccess { ref method } if method == "secret"));
    let err = secret.call(&obj, &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::ProtectedAccess { .. }));
}

#[test]
fn protected_own_field_runs_from_inside_a_method() {
    let class = Class::define(
        Descriptor::named("Holder").method("peek", |this, _| this.call("stash", &[])),
    )
    .unwrap();
    let obj = class.construct(&[]).unwrap();
    obj.set("stash", Function::protected(|_, _| Ok(Value::from(7))));

    assert_eq!(obj.call("peek", &[]).unwrap(), Value::from(7));
    assert!(obj.call("stash", &[]).is_err());
}

#[test]
fn caller_marker_is_cleared_after_errors() {
    let class = Class::define(
        Descriptor::named("Flaky")
            .method("boom", |_, _| Err(RuntimeError::Handler("boom".into())))
            .protected("inner", |_, _| Ok(Value::Null)),
    )
    .unwrap();
    let obj = class.construct(&[]).unwrap();

    assert!(obj.call("boom", &[]).is_err());
    assert_eq!(obj.caller(), None);
    assert!(matches!(
        obj.call("inner", &[]),
        Err(RuntimeError::ProtectedAccess { .. })
    ));
}

#[test]
fn caller_tracks_nested_members() {
    let seen: Rc<RefCell<Vec<(Option<String>, Option<String>)>>> = Rc::default();
    let seen_inner = Rc::clone(&seen);
    let class = Class::define(
        Descriptor::named("Nested")
            .method("outer", |this, _| this.call("inner", &[]))
            .method("inner", move |this, _| {
                seen_inner
                    .borrow_mut()
                    .push((this.caller(), this.previous_caller()));
                Ok(Value::Null)
            }),
    )
    .unwrap();
    let obj = class.construct(&[]).unwrap();

    obj.call("outer", &[]).unwrap();
    assert_eq!(
        seen.borrow()[0],
        (Some("inner".to_string()), Some("outer".to_string()))
    );
    assert_eq!(obj.caller(), None);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Construction
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn initializer_runs_under_constructor_marker() {
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
    let seen_init = Rc::clone(&seen);
    let class = Class::define(Descriptor::named("Point").initialize(move |this, args| {
        seen_init.borrow_mut().push(this.previous_caller());
        this.set("x", args[0].clone());
        this.set("y", args[1].clone());
        Ok(Value::Null)
    }))
    .unwrap();

    let p = class.construct(&[1.into(), 2.into()]).unwrap();
    assert_eq!(p.get("x"), Some(Value::from(1)));
    assert_eq!(p.get("y"), Some(Value::from(2)));
    assert_eq!(seen.borrow()[0], Some(CONSTRUCTOR.to_string()));
    assert_eq!(p.caller(), None);
}

#[test]
fn initializer_may_call_protected_members() {
    let class = Class::define(
        Descriptor::named("Setup")
            .protected("prepare", |this, _| {
                this.set("ready", true);
                Ok(Value::Null)
            })
            .initialize(|this, _| this.call("prepare", &[])),
    )
    .unwrap();

    let obj = class.construct(&[]).unwrap();
    assert_eq!(obj.get("ready"), Some(Value::Bool(true)));
}

#[test]
fn initializer_returning_an_object_replaces_the_instance() {
    let replacement = Object::new();
    let handle = replacement.clone();
    let class = Class::define(
        Descriptor::named("Factory").initialize(move |_, _| Ok(Value::Object(handle.clone()))),
    )
    .unwrap();

    let obj = class.construct(&[]).unwrap();
    assert!(obj.ptr_eq(&replacement));

    let scalar = Class::define(Descriptor::named("Scalar").initialize(|_, _| Ok(Value::from(7))))
        .unwrap();
    let obj = scalar.construct(&[]).unwrap();
    assert!(obj.class().unwrap().ptr_eq(&scalar));
}

#[test]
fn bare_function_is_the_initializer() {
    let class = Class::define(Function::new(|this, args| {
        this.set("name", args[0].clone());
        Ok(Value::Null)
    }))
    .unwrap();

    assert!(class.lookup(INITIALIZE).is_some());
    let obj = class.construct(&["ada".into()]).unwrap();
    assert_eq!(obj.get("name"), Some(Value::from("ada")));
}

#[test]
fn initializer_error_propagates() {
    let class = Class::define(
        Descriptor::named("Broken").initialize(|_, _| Err(RuntimeError::Handler("nope".into()))),
    )
    .unwrap();
    assert!(matches!(
        class.construct(&[]),
        Err(RuntimeError::Handler(ref msg)) if msg == "nope"
    ));
}

#[test]
fn get_prototype_skips_the_initializer() {
    let runs = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&runs);
    let class = Class::define(
        Descriptor::named("Counted")
            .member("tags", json!(["a"]))
            .initialize(move |_, _| {
                *counter.borrow_mut() += 1;
                Ok(Value::Null)
            }),
    )
    .unwrap();

    let template = class.get_prototype();
    assert_eq!(*runs.borrow(), 0);
    assert_eq!(template.fields().get("tags"), Some(&Value::from(json!(["a"]))));

    class.construct(&[]).unwrap();
    assert_eq!(*runs.borrow(), 1);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Instance isolation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn nested_containers_never_alias_across_instances() {
    let class = Class::define(
        Descriptor::named("Widget")
            .member("style", json!({"rgb": {"r": 0, "g": 0}, "layers": [1, 2]}))
            .member("tags", json!(["base"]))
            .member("label", "plain"),
    )
    .unwrap();

    let x = class.construct(&[]).unwrap();
    let y = class.construct(&[]).unwrap();

    x.update("style", |style| {
        let style = style.as_map_mut().unwrap();
        style
            .get_mut("rgb")
            .and_then(Value::as_map_mut)
            .unwrap()
            .insert("r".into(), Value::from(255));
        style
            .get_mut("layers")
            .and_then(Value::as_array_mut)
            .unwrap()
            .push(Value::from(3));
    });
    x.update("tags", |tags| tags.as_array_mut().unwrap().push("x-only".into()));

    let y_style = y.get("style").unwrap();
    assert_eq!(y_style.get("rgb").unwrap().get("r"), Some(&Value::from(0)));
    assert_eq!(y_style.get("layers").unwrap().as_array().unwrap().len(), 2);
    assert_eq!(y.get("tags"), Some(Value::from(json!(["base"]))));

    let default_style = class.lookup("style").unwrap();
    assert_eq!(default_style.get("rgb").unwrap().get("r"), Some(&Value::from(0)));

    let x_style = x.get("style").unwrap();
    assert_eq!(x_style.get("rgb").unwrap().get("r"), Some(&Value::from(255)));
}

#[test]
fn scalars_are_read_through_the_prototype() {
    let class = Class::define(Descriptor::named("Label").member("text", "hi")).unwrap();
    let obj = class.construct(&[]).unwrap();

    assert!(obj.fields().get("text").is_none());
    assert_eq!(obj.get("text"), Some(Value::from("hi")));

    obj.set("text", "bye");
    assert_eq!(obj.get("text"), Some(Value::from("bye")));
    assert_eq!(class.lookup("text"), Some(Value::from("hi")));

    obj.remove("text");
    assert_eq!(obj.get("text"), Some(Value::from("hi")));
}

#[test]
fn update_keeps_field_position_and_visibility() {
    let obj = Object::new();
    obj.set_all([("a", 1), ("b", 2), ("c", 3)]);

    let seen = obj.update("a", |value| {
        *value = Value::from(10);
        obj.get("a")
    });

    assert_eq!(seen, Some(Value::from(1)));
    assert_eq!(obj.get("a"), Some(Value::from(10)));
    let keys: Vec<String> = obj.fields().keys().cloned().collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn reset_restores_container_defaults() {
    let class = Class::define(Descriptor::named("List").member("items", json!([]))).unwrap();
    let obj = class.construct(&[]).unwrap();
    obj.update("items", |items| items.as_array_mut().unwrap().push(1.into()));
    obj.set("label", "kept");

    Class::reset(&obj);
    assert_eq!(obj.get("items"), Some(Value::Array(vec![])));
    assert_eq!(obj.get("label"), Some(Value::from("kept")));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Implements and the default merge
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn implements_merges_classes_and_maps_in_order() {
    let colorable = Class::define(
        Descriptor::named("Colorable")
            .member("color", json!({"r": 0, "g": 0}))
            .member("size", 1)
            .method("paint", |this, args| {
                this.update("color", |c| {
                    c.as_map_mut().unwrap().insert("r".into(), args[0].clone())
                });
                Ok(Value::Null)
            }),
    )
    .unwrap();

    let mixin: Map = match Value::from(json!({"color": {"b": 9}, "size": 2})) {
        Value::Map(map) => map,
        _ => unreachable!(),
    };

    let tile = Class::define(
        Descriptor::named("Tile").implements([Value::from(&colorable), Value::Map(mixin)]),
    )
    .unwrap();

    assert_eq!(
        tile.lookup("color"),
        Some(Value::from(json!({"r": 0, "g": 0, "b": 9})))
    );
    assert_eq!(tile.lookup("size"), Some(Value::from(2)));

    let paint = tile.lookup("paint").unwrap();
    let paint = paint.as_function().unwrap();
    assert!(paint.owner().unwrap().ptr_eq(&tile));

    let obj = tile.construct(&[]).unwrap();
    obj.call("paint", &[Value::from(200)]).unwrap();
    assert_eq!(obj.get("color").unwrap().get("r"), Some(&Value::from(200)));
}

#[test]
fn implements_accepts_a_single_item() {
    let mixin = Class::define(Descriptor::named("Mixin").method("hello", |_, _| Ok("hi".into())))
        .unwrap();
    let class = Class::define(Descriptor::named("Host").member(IMPLEMENTS, &mixin)).unwrap();

    let obj = class.construct(&[]).unwrap();
    assert_eq!(obj.call("hello", &[]).unwrap(), Value::from("hi"));
}

#[test]
fn implements_rejects_scalars() {
    let err = Class::define(Descriptor::named("Bad").implements([Value::from("nope")])).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidMutatorValue { ref mutator, .. } if mutator == IMPLEMENTS));
}

#[test]
fn implement_deep_merges_maps_and_replaces_everything_else() {
    let class = Class::define(Descriptor::named("Options")).unwrap();
    class.implement("options", json!({"a": {"x": 1}, "list": [1]})).unwrap();
    class.implement("options", json!({"a": {"y": 2}, "b": 3, "list": [2]})).unwrap();
    class.implement("items", json!([1, 2])).unwrap();
    class.implement("items", json!([3])).unwrap();
    class.implement("name", "first").unwrap();
    class.implement("name", json!({"now": "a map"})).unwrap();

    assert_eq!(
        class.lookup("options"),
        Some(Value::from(json!({"a": {"x": 1, "y": 2}, "list": [2], "b": 3})))
    );
    assert_eq!(class.lookup("items"), Some(Value::from(json!([3]))));
    assert_eq!(class.lookup("name"), Some(Value::from(json!({"now": "a map"}))));
}

#[test]
fn implement_wraps_origin_and_skips_hidden_functions() {
    let class = Class::define(Descriptor::named("Host")).unwrap();
    let body = Function::new(|_, _| Ok(Value::from("ok")));

    class.implement("run", body.clone()).unwrap();
    class.implement("ghost", body.clone().hide()).unwrap();

    let installed = class.lookup("run").unwrap();
    let installed = installed.as_function().unwrap();
    assert!(installed.is_wrapped());
    assert!(installed.origin().ptr_eq(&body));
    assert_eq!(installed.member_name(), Some("run"));
    assert!(class.lookup("ghost").is_none());

    // Re-implementing a trampoline wraps its origin, never the trampoline.
    let other = Class::define(Descriptor::named("Other")).unwrap();
    other.implement("run", installed.clone()).unwrap();
    let rewrapped = other.lookup("run").unwrap();
    assert!(rewrapped.as_function().unwrap().origin().ptr_eq(&body));
}

#[test]
fn implement_all_applies_pairs_in_order() {
    let class = Class::define(Descriptor::named("Batch")).unwrap();
    class
        .implement_all([("a", Value::from(1)), ("b", Value::from(2)), ("a", Value::from(3))])
        .unwrap();
    assert_eq!(class.lookup("a"), Some(Value::from(3)));
    assert_eq!(class.lookup("b"), Some(Value::from(2)));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Object member access
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn call_reports_missing_and_non_callable_members() {
    let class = Class::define(Descriptor::named("Data").member("value", 1)).unwrap();
    let obj = class.construct(&[]).unwrap();

    assert!(matches!(
        obj.call("nothing", &[]),
        Err(RuntimeError::MissingMember { ref member }) if member == "nothing"
    ));
    assert!(matches!(
        obj.call("value", &[]),
        Err(RuntimeError::NotCallable { found: ValueKind::Number, .. })
    ));
}

#[test]
fn members_overlays_own_fields_on_defaults() {
    let class = Class::define(
        Descriptor::named("Layered")
            .member("a", 1)
            .member("b", 2),
    )
    .unwrap();
    let obj = class.construct(&[]).unwrap();
    obj.set("b", 20).set("c", 30);

    let members = obj.members();
    assert_eq!(members.get("a"), Some(&Value::from(1)));
    assert_eq!(members.get("b"), Some(&Value::from(20)));
    assert_eq!(members.get("c"), Some(&Value::from(30)));
    assert!(obj.has("a"));
    assert!(!obj.has("z"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Mutator registration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn registered_mutator_can_consume_a_key() {
    mutator::register("TestBinds", |class, value| {
        let names = value.as_array().cloned().unwrap_or_default();
        class.implement("bound", Value::Array(names))?;
        Ok(None)
    });

    let class = Class::define(Descriptor::named("Bound").member("TestBinds", json!(["a", "b"])))
        .unwrap();
    assert!(class.lookup("TestBinds").is_none());
    assert_eq!(class.lookup("bound"), Some(Value::from(json!(["a", "b"]))));

    assert!(mutator::unregister("TestBinds"));
    assert!(!mutator::is_registered("TestBinds"));
}

#[test]
fn registered_mutator_can_rewrite_a_value() {
    mutator::register("TestUpper", |_, value| {
        Ok(Some(Value::from(
            value.as_str().unwrap_or_default().to_uppercase(),
        )))
    });

    let class = Class::define(Descriptor::named("Loud").member("TestUpper", "quiet")).unwrap();
    assert_eq!(class.lookup("TestUpper"), Some(Value::from("QUIET")));

    mutator::unregister("TestUpper");
}

#[test]
fn builtin_mutators_are_registered() {
    assert!(mutator::is_registered(EXTENDS));
    assert!(mutator::is_registered(IMPLEMENTS));
}
