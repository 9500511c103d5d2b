// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tests for TypeMetadata.

use super::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct Motor {
    rpm: u32,
    name: String,
    enabled: bool,
}

fn motor_table() -> TypeMetadata<Motor> {
    let mut table = TypeMetadata::<Motor>::new();
    table
        .add_field("rpm", FieldRef::new(|m: &Motor| &m.rpm, |m: &mut Motor| &mut m.rpm))
        .unwrap();
    table
        .add_field(
            "name",
            FieldRef::new(|m: &Motor| &m.name, |m: &mut Motor| &mut m.name),
        )
        .unwrap();
    table
        .add_field(
            "enabled",
            FieldRef::new(|m: &Motor| &m.enabled, |m: &mut Motor| &mut m.enabled),
        )
        .unwrap();
    table
}

#[test]
fn test_registration_order() {
    let table = motor_table();
    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
    assert_eq!(table.identity(), TypeIdentity::of::<Motor>());
    assert_eq!(
        table.field_names().collect::<Vec<_>>(),
        vec!["rpm", "name", "enabled"]
    );
    assert!(table.contains_field("name"));
    assert!(!table.contains_field("torque"));
}

#[test]
fn test_get_set_round_trip() {
    let table = motor_table();
    let mut motor = Motor::default();

    table.set_field(&mut motor, "rpm", 3_000u32).unwrap();
    table
        .set_field(&mut motor, "name", "left".to_string())
        .unwrap();
    table.set_field(&mut motor, "enabled", true).unwrap();

    assert_eq!(table.get_field::<u32>(&motor, "rpm").unwrap(), 3_000);
    assert_eq!(table.get_field::<String>(&motor, "name").unwrap(), "left");
    assert!(table.get_field::<bool>(&motor, "enabled").unwrap());
    assert_eq!(
        motor,
        Motor {
            rpm: 3_000,
            name: "left".to_string(),
            enabled: true,
        }
    );
}

#[test]
fn test_field_ref_and_mut() {
    let table = motor_table();
    let mut motor = Motor::default();

    table
        .field_mut::<String>(&mut motor, "name")
        .unwrap()
        .push_str("right");
    assert_eq!(table.field_ref::<String>(&motor, "name").unwrap(), "right");
}

#[test]
fn test_type_mismatch() {
    let table = motor_table();
    let mut motor = Motor::default();

    let err = table.get_field::<String>(&motor, "rpm").unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(err.to_string().contains("rpm"));

    let err = table.set_field(&mut motor, "rpm", 1i64).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(motor.rpm, 0);
}

#[test]
fn test_field_not_found() {
    let table = motor_table();
    let mut motor = Motor::default();

    let err = table.find_field("torque").unwrap_err();
    assert!(err.is_field_not_found());
    assert!(err.to_string().contains("torque"));

    assert!(table
        .get_field::<u32>(&motor, "torque")
        .unwrap_err()
        .is_field_not_found());
    assert!(table
        .set_field(&mut motor, "torque", 1u32)
        .unwrap_err()
        .is_field_not_found());
}

#[test]
fn test_duplicate_field_rejected() {
    let mut table = motor_table();
    let err = table
        .add_field("rpm", FieldRef::new(|m: &Motor| &m.rpm, |m: &mut Motor| &mut m.rpm))
        .unwrap_err();
    assert!(matches!(err, ReflectError::DuplicateField { .. }));
    assert_eq!(table.len(), 3);
}

#[test]
fn test_erased_view() {
    let table = motor_table();
    let view: &dyn MetadataView = &table;
    let mut motor = Motor::default();

    view.set_dyn(&mut motor, "rpm", &1_200u32).unwrap();
    assert_eq!(
        view.get_dyn(&motor, "rpm").unwrap().downcast_ref::<u32>(),
        Some(&1_200)
    );

    *view
        .get_dyn_mut(&mut motor, "enabled")
        .unwrap()
        .downcast_mut::<bool>()
        .unwrap() = true;
    assert!(motor.enabled);

    assert!(view.get_dyn(&motor, "torque").unwrap_err().is_field_not_found());
    assert!(view
        .set_dyn(&mut motor, "rpm", &"fast")
        .unwrap_err()
        .is_type_mismatch());
}

#[test]
fn test_erased_view_debug() {
    let table: std::sync::Arc<dyn MetadataView> = std::sync::Arc::new(motor_table());
    let rendered = format!("{:?}", table);
    assert!(rendered.starts_with("MetadataView"));
    assert!(rendered.contains("Motor"));
    assert!(rendered.contains("\"enabled\""));

    let missing: Result<std::sync::Arc<dyn MetadataView>> = Err(ReflectError::UnknownType {
        ty: "Nothing",
    });
    assert!(missing.unwrap_err().is_unknown_type());
}

#[test]
fn test_typed_mismatch_reports_declared_type() {
    let table = motor_table();
    let mut motor = Motor::default();

    match table.field_mut::<u64>(&mut motor, "rpm").unwrap_err() {
        ReflectError::TypeMismatch {
            field, declared, ..
        } => {
            assert_eq!(field, "rpm");
            assert_eq!(declared, "u32");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
    assert!(table
        .set_field(&mut motor, "name", 3u8)
        .unwrap_err()
        .is_type_mismatch());
    assert!(table
        .field_ref::<bool>(&motor, "name")
        .unwrap_err()
        .is_type_mismatch());
}
