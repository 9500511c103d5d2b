// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for metadata construction and field access.
//!
//! Every variant carries the field and type names involved so callers can
//! render them when reporting. None of these errors are transient: they all
//! describe a contract violation by the caller or by a registration routine.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReflectError>;

/// Metadata errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    /// The requested value type differs from the field's declared type.
    #[error("Field type mismatch: \"{declared} {field}\" and \"{requested}\"")]
    TypeMismatch {
        field: String,
        declared: &'static str,
        requested: String,
    },

    /// No field with that name was registered on the type.
    #[error("Failed to find field \"{field}\" on {ty}")]
    FieldNotFound { ty: &'static str, field: String },

    /// The type has no registration routine.
    #[error("Unknown type: {ty}")]
    UnknownType { ty: &'static str },

    /// An instance handle of the wrong concrete type was passed to a field accessor.
    #[error("Instance mismatch on field \"{field}\": expected {expected}, got {actual}")]
    InstanceMismatch {
        field: String,
        expected: &'static str,
        actual: String,
    },

    /// A field name was registered twice on the same type.
    #[error("Duplicate field \"{field}\" on {ty}")]
    DuplicateField { ty: &'static str, field: String },

    /// Two attributes of the same type were attached to one field.
    #[error("Duplicate attribute {attribute} on field \"{field}\"")]
    DuplicateAttribute {
        field: String,
        attribute: &'static str,
    },

    /// A required attribute is absent from the field.
    #[error("Attribute {attribute} not found on field \"{field}\"")]
    AttributeNotFound {
        field: String,
        attribute: &'static str,
    },

    /// Attributes were declared after the last field of a registration routine.
    #[error("{count} attribute(s) declared on {ty} without a following field")]
    DanglingAttributes { ty: &'static str, count: usize },

    /// A registration routine asked for metadata of the type it is building.
    #[error("Recursive metadata build for {ty}")]
    RecursiveBuild { ty: &'static str },

    /// A registration routine was already installed for the type.
    #[error("Registration routine already installed for {ty}")]
    DuplicateRoutine { ty: &'static str },
}

impl ReflectError {
    /// Returns `true` for [`ReflectError::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Returns `true` for [`ReflectError::FieldNotFound`].
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound { .. })
    }

    /// Returns `true` for [`ReflectError::UnknownType`].
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownType { .. })
    }
}
