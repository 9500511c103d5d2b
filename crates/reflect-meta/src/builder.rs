// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration builder.
//!
//! A [`MetadataBuilder`] is created fresh for each build run of a type and is
//! consumed when the run finishes. Attributes can be attached in two ways:
//!
//! - declared with [`MetadataBuilder::attribute`] *before* a field: they are
//!   buffered and the next [`MetadataBuilder::field`] call takes the whole
//!   buffer;
//! - attached directly to the [`FieldBuilder`] returned by `field`.
//!
//! # Example
//!
//! ```
//! use reflect_meta::{FieldRef, MetadataBuilder, Reflect, Result};
//!
//! struct Range { min: i32, max: i32 }
//! struct Point { x: i32, y: i32 }
//!
//! impl Reflect for Point {
//!     fn reflect(builder: &mut MetadataBuilder<Self>) -> Result<()> {
//!         builder.attribute(Range { min: 0, max: 100 });
//!         builder.field("x", FieldRef::new(|p: &Point| &p.x, |p: &mut Point| &mut p.x))?;
//!         builder.field("y", FieldRef::new(|p: &Point| &p.y, |p: &mut Point| &mut p.y))?;
//!         Ok(())
//!     }
//! }
//!
//! let table = reflect_meta::metadata_of::<Point>()?;
//! let range = table.find_field("x")?.find_attribute_of::<Range>().unwrap();
//! assert_eq!((range.min, range.max), (0, 100));
//! assert!(table.find_field("y")?.find_attribute_of::<Range>().is_none());
//! # Ok::<(), reflect_meta::ReflectError>(())
//! ```

use crate::attribute::AttributeDescriptor;
use crate::config::{DanglingAttributes, RegistryConfig};
use crate::error::{ReflectError, Result};
use crate::field::{FieldDescriptor, FieldRef};
use crate::table::TypeMetadata;
use std::any::Any;

/// Registration routine for `T`.
pub type Routine<T> = fn(&mut MetadataBuilder<T>) -> Result<()>;

/// Types that carry their own registration routine.
pub trait Reflect: Any + Sized {
    /// Declare the attributes and fields of `Self`.
    ///
    /// Runs once per registry on success. Requesting metadata of `Self` from
    /// here fails with [`ReflectError::RecursiveBuild`].
    fn reflect(builder: &mut MetadataBuilder<Self>) -> Result<()>;
}

/// Stateful accumulator used while building one [`TypeMetadata`].
#[derive(Debug)]
pub struct MetadataBuilder<T> {
    metadata: TypeMetadata<T>,
    pending: Vec<AttributeDescriptor>,
    config: RegistryConfig,
}

impl<T: Any> MetadataBuilder<T> {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            metadata: TypeMetadata::new(),
            pending: Vec::new(),
            config,
        }
    }

    /// Buffer an attribute for the next field.
    pub fn attribute<A: Any + Send + Sync>(&mut self, value: A) -> &mut Self {
        self.attribute_descriptor(AttributeDescriptor::new(value))
    }

    /// Buffer a lazily built attribute for the next field.
    pub fn lazy_attribute<A: Any + Send + Sync>(&mut self, init: fn() -> A) -> &mut Self {
        self.attribute_descriptor(AttributeDescriptor::lazy(init))
    }

    pub fn attribute_descriptor(&mut self, attribute: AttributeDescriptor) -> &mut Self {
        self.pending.push(attribute);
        self
    }

    /// Number of attributes waiting for a field.
    pub fn pending_attributes(&self) -> usize {
        self.pending.len()
    }

    /// Register a field, moving every pending attribute onto it.
    pub fn field<V>(
        &mut self,
        name: impl Into<String>,
        selector: FieldRef<T, V>,
    ) -> Result<FieldBuilder<'_>>
    where
        V: Any + Clone,
    {
        let policy = self.config.duplicate_attributes;
        let pending = std::mem::take(&mut self.pending);
        let field = self.metadata.add_field(name, selector)?;
        for attribute in pending {
            field.attach(attribute, policy)?;
        }
        Ok(FieldBuilder { field, config: self.config })
    }

    /// Finalize the table.
    pub fn finish(self) -> Result<TypeMetadata<T>> {
        if !self.pending.is_empty() {
            let ty = self.metadata.identity().name();
            match self.config.dangling_attributes {
                DanglingAttributes::Discard => {
                    log::warn!(
                        "[builder] {}: discarding {} attribute(s) declared after the last field",
                        ty,
                        self.pending.len()
                    );
                }
                DanglingAttributes::Reject => {
                    return Err(ReflectError::DanglingAttributes {
                        ty,
                        count: self.pending.len(),
                    });
                }
            }
        }
        Ok(self.metadata)
    }

    /// Run `routine` on a fresh builder and finalize.
    pub fn run(config: RegistryConfig, routine: Routine<T>) -> Result<TypeMetadata<T>> {
        let mut builder = Self::new(config);
        routine(&mut builder)?;
        builder.finish()
    }
}

/// Builder scoped to the field just registered.
#[derive(Debug)]
pub struct FieldBuilder<'b> {
    field: &'b mut FieldDescriptor,
    config: RegistryConfig,
}

impl FieldBuilder<'_> {
    /// Attach an attribute to this field.
    pub fn attribute<A: Any + Send + Sync>(self, value: A) -> Result<Self> {
        self.attribute_descriptor(AttributeDescriptor::new(value))
    }

    /// Attach a lazily built attribute to this field.
    pub fn lazy_attribute<A: Any + Send + Sync>(self, init: fn() -> A) -> Result<Self> {
        self.attribute_descriptor(AttributeDescriptor::lazy(init))
    }

    pub fn attribute_descriptor(self, attribute: AttributeDescriptor) -> Result<Self> {
        self.field
            .attach(attribute, self.config.duplicate_attributes)?;
        Ok(self)
    }

    /// The descriptor being built.
    pub fn descriptor(&self) -> &FieldDescriptor {
        &*self.field
    }
}
