// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tests for FieldDescriptor.

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct Sensor {
    id: u32,
    label: String,
}

#[derive(Debug, PartialEq)]
struct Unit(&'static str);

#[derive(Debug, PartialEq)]
struct Precision(u8);

fn sensor() -> Sensor {
    Sensor {
        id: 7,
        label: "north".to_string(),
    }
}

fn id_field() -> FieldDescriptor {
    FieldDescriptor::new(
        "id".to_string(),
        FieldRef::new(|s: &Sensor| &s.id, |s: &mut Sensor| &mut s.id),
    )
}

fn label_field() -> FieldDescriptor {
    FieldDescriptor::new(
        "label".to_string(),
        FieldRef::new(|s: &Sensor| &s.label, |s: &mut Sensor| &mut s.label),
    )
}

#[test]
fn test_descriptor_identity() {
    let field = id_field();
    assert_eq!(field.name(), "id");
    assert_eq!(field.owner(), TypeIdentity::of::<Sensor>());
    assert_eq!(field.type_identity(), TypeIdentity::of::<u32>());
    assert!(field.attributes().is_empty());
}

#[test]
fn test_typed_access() {
    let field = label_field();
    let mut s = sensor();

    assert_eq!(field.get::<Sensor, String>(&s).unwrap(), "north");
    field
        .get_mut::<Sensor, String>(&mut s)
        .unwrap()
        .push_str("-east");
    assert_eq!(s.label, "north-east");

    field.set(&mut s, "south".to_string()).unwrap();
    assert_eq!(s.label, "south");
}

#[test]
fn test_typed_access_wrong_value_type() {
    let field = id_field();
    let mut s = sensor();

    let err = field.get::<Sensor, u64>(&s).unwrap_err();
    assert!(err.is_type_mismatch());
    let err = field.set(&mut s, 9i32).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(s.id, 7);
}

#[test]
fn test_typed_access_wrong_owner() {
    let field = id_field();
    let other = 5u32;
    let err = field.get::<u32, u32>(&other).unwrap_err();
    assert!(matches!(err, ReflectError::InstanceMismatch { .. }));
}

#[test]
fn test_erased_access() {
    let field = id_field();
    let mut s = sensor();

    let value = field.get_dyn(&s).unwrap();
    assert_eq!(value.downcast_ref::<u32>(), Some(&7));

    field.set_dyn(&mut s, &42u32).unwrap();
    assert_eq!(s.id, 42);

    *field
        .get_dyn_mut(&mut s)
        .unwrap()
        .downcast_mut::<u32>()
        .unwrap() += 1;
    assert_eq!(s.id, 43);
}

#[test]
fn test_erased_set_copies_value() {
    let field = label_field();
    let mut s = sensor();
    let mut source = "copied".to_string();

    field.set_dyn(&mut s, &source).unwrap();
    source.push('!');
    assert_eq!(s.label, "copied");
}

#[test]
fn test_erased_access_errors() {
    let field = id_field();
    let mut s = sensor();
    let mut stranger = String::from("not a sensor");

    assert!(matches!(
        field.get_dyn(&stranger),
        Err(ReflectError::InstanceMismatch { .. })
    ));
    assert!(matches!(
        field.get_dyn_mut(&mut stranger),
        Err(ReflectError::InstanceMismatch { .. })
    ));
    assert!(matches!(
        field.set_dyn(&mut stranger, &1u32),
        Err(ReflectError::InstanceMismatch { .. })
    ));

    let err = field.set_dyn(&mut s, &"seven").unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(s.id, 7);
}

#[test]
fn test_erased_set_checks_value_before_instance() {
    let field = id_field();
    let mut stranger = String::from("not a sensor");

    let err = field.set_dyn(&mut stranger, &"seven").unwrap_err();
    match &err {
        ReflectError::TypeMismatch {
            field,
            declared,
            requested,
        } => {
            assert_eq!(field, "id");
            assert_eq!(*declared, "u32");
            assert!(requested.starts_with("<erased TypeId"));
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
    assert!(err.to_string().contains("u32 id"));
    assert_eq!(stranger, "not a sensor");
}

#[test]
fn test_erased_instance_mismatch_names_owner() {
    let field = label_field();
    let stranger = 5u64;

    match field.get_dyn(&stranger).unwrap_err() {
        ReflectError::InstanceMismatch {
            field,
            expected,
            actual,
        } => {
            assert_eq!(field, "label");
            assert!(expected.ends_with("Sensor"));
            assert_eq!(actual, format!("<erased {:?}>", TypeId::of::<u64>()));
        }
        other => panic!("expected InstanceMismatch, got {other:?}"),
    }
}

#[test]
fn test_attributes_lookup() {
    let mut field = id_field();
    field
        .attach(AttributeDescriptor::new(Unit("m/s")), DuplicateAttributes::Reject)
        .unwrap();
    field
        .attach(AttributeDescriptor::new(Precision(2)), DuplicateAttributes::Reject)
        .unwrap();

    assert_eq!(field.attributes().len(), 2);
    assert_eq!(*field.find_attribute_of::<Unit>().unwrap(), Unit("m/s"));
    assert_eq!(*field.find_attribute_of::<Precision>().unwrap(), Precision(2));
    assert!(field.has_attribute::<Unit>());
    assert!(!field.has_attribute::<String>());
    assert!(field.find_attribute(TypeIdentity::of::<String>()).is_none());

    let handle = field.find_attribute(TypeIdentity::of::<Unit>()).unwrap();
    assert_eq!(handle.downcast_ref::<Unit>(), Some(&Unit("m/s")));
}

#[test]
fn test_require_attribute() {
    let field = label_field();
    let err = field.require_attribute::<Unit>().unwrap_err();
    assert!(matches!(err, ReflectError::AttributeNotFound { .. }));
    assert!(err.to_string().contains("label"));
}

#[test]
fn test_duplicate_attribute_policies() {
    let mut field = id_field();
    field
        .attach(AttributeDescriptor::new(Unit("first")), DuplicateAttributes::Reject)
        .unwrap();

    let err = field
        .attach(AttributeDescriptor::new(Unit("second")), DuplicateAttributes::Reject)
        .unwrap_err();
    assert!(matches!(err, ReflectError::DuplicateAttribute { .. }));

    field
        .attach(
            AttributeDescriptor::new(Unit("third")),
            DuplicateAttributes::KeepFirst,
        )
        .unwrap();
    assert_eq!(field.attributes().len(), 1);
    assert_eq!(*field.find_attribute_of::<Unit>().unwrap(), Unit("first"));
}
