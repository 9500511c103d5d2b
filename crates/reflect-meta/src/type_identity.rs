// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type identity tokens.
//!
//! `TypeIdentity` is the key used for both field types and attribute types.
//! Comparison and hashing only look at the underlying [`TypeId`]; the name is
//! carried along so errors and logs can say which type was involved.

use crate::error::{ReflectError, Result};
use std::any::{self, Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Process-wide token identifying one concrete type.
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    name: &'static str,
}

impl TypeIdentity {
    /// Identity of `T`.
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Underlying [`TypeId`].
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified type name (diagnostics only, not guaranteed stable).
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether this identity denotes `T`.
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({})", self.name)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Fail with [`ReflectError::TypeMismatch`] unless `actual == required`.
///
/// Every typed read or write goes through here before a handle is downcast.
pub fn check_type_match(
    actual: TypeIdentity,
    field_name: &str,
    required: TypeIdentity,
) -> Result<()> {
    if actual != required {
        return Err(ReflectError::TypeMismatch {
            field: field_name.to_string(),
            declared: actual.name(),
            requested: required.name().to_string(),
        });
    }
    Ok(())
}
