// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # reflect-meta - field-level reflection metadata
//!
//! Builds, once per type, a table describing the type's fields: name,
//! declared type, accessors working through type-erased handles, and typed
//! attributes attached at registration time. Serializers, UI binders and
//! validators use the table to read and write instances without compile-time
//! knowledge of the concrete type.
//!
//! ## Quick Start
//!
//! ```rust
//! use reflect_meta::{metadata_of, FieldRef, MetadataBuilder, Reflect, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Range { min: i32, max: i32 }
//!
//! #[derive(Default)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Reflect for Point {
//!     fn reflect(builder: &mut MetadataBuilder<Self>) -> Result<()> {
//!         builder
//!             .field("x", FieldRef::new(|p: &Point| &p.x, |p: &mut Point| &mut p.x))?
//!             .attribute(Range { min: 0, max: 100 })?;
//!         builder.field("y", FieldRef::new(|p: &Point| &p.y, |p: &mut Point| &mut p.y))?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let table = metadata_of::<Point>()?;
//!     let mut p = Point::default();
//!
//!     table.set_field(&mut p, "x", 42)?;
//!     assert_eq!(table.get_field::<i32>(&p, "x")?, 42);
//!     assert!(table.get_field::<String>(&p, "x").is_err());
//!
//!     let range = table.find_field("x")?.require_attribute::<Range>()?;
//!     assert_eq!(*range, Range { min: 0, max: 100 });
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Registry         TypeIdentity -> table, one guarded build    |
//! +---------------------------------------------------------------+
//! |  MetadataBuilder  pending attributes -> next field            |
//! +---------------------------------------------------------------+
//! |  TypeMetadata<T>  ordered FieldDescriptors, typed get/set     |
//! |  MetadataView     same table, erased                          |
//! +---------------------------------------------------------------+
//! |  FieldDescriptor  accessors over &dyn Any, attributes         |
//! |  TypeIdentity     TypeId + name, check_type_match             |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Registry`] | Process-wide type -> table mapping |
//! | [`TypeMetadata`] | Field table for one type |
//! | [`FieldDescriptor`] | Name, types, accessors and attributes of a field |
//! | [`MetadataBuilder`] | Accumulator driven by a registration routine |
//! | [`ReflectError`] | Every failure the crate reports |

pub mod attribute;
pub mod builder;
pub mod config;
pub mod error;
pub mod field;
pub mod registry;
pub mod table;
pub mod type_identity;

pub use attribute::{AttributeDescriptor, AttributeHandle};
pub use builder::{FieldBuilder, MetadataBuilder, Reflect, Routine};
pub use config::{DanglingAttributes, DuplicateAttributes, RegistryConfig};
pub use error::{ReflectError, Result};
pub use field::{FieldDescriptor, FieldRef};
pub use registry::{Registry, RegistryStats};
pub use table::{MetadataView, TypeMetadata};
pub use type_identity::{check_type_match, TypeIdentity};

use std::sync::Arc;

/// Table for `T` from the global registry, built on first call.
///
/// Every call returns the same `Arc`.
pub fn metadata_of<T: Reflect>() -> Result<Arc<TypeMetadata<T>>> {
    Registry::global().metadata_of::<T>()
}

/// Erased table for `ty` from the global registry.
pub fn lookup(ty: TypeIdentity) -> Result<Arc<dyn MetadataView>> {
    Registry::global().lookup(ty)
}
