// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type metadata tables.
//!
//! A [`TypeMetadata<T>`] is an ordered list of [`FieldDescriptor`]s for one
//! concrete type. It is filled by a [`MetadataBuilder`](crate::MetadataBuilder)
//! and becomes read-only once the registry publishes it.
//!
//! [`MetadataView`] is the non-generic face of the same table, for consumers
//! that only hold a [`TypeIdentity`] and erased instance handles.

use crate::error::{ReflectError, Result};
use crate::field::{FieldDescriptor, FieldRef};
use crate::type_identity::TypeIdentity;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Object-safe view over a metadata table.
pub trait MetadataView: Send + Sync {
    /// Type described by this table.
    fn identity(&self) -> TypeIdentity;

    /// Fields in registration order.
    fn fields(&self) -> &[FieldDescriptor];

    /// Look up a field by name.
    fn find_field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields()
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ReflectError::FieldNotFound {
                ty: self.identity().name(),
                field: name.to_string(),
            })
    }

    /// Read a field through an erased instance handle.
    fn get_dyn<'a>(&self, instance: &'a dyn Any, name: &str) -> Result<&'a dyn Any> {
        self.find_field(name)?.get_dyn(instance)
    }

    /// Mutable access through an erased instance handle.
    fn get_dyn_mut<'a>(&self, instance: &'a mut dyn Any, name: &str) -> Result<&'a mut dyn Any> {
        self.find_field(name)?.get_dyn_mut(instance)
    }

    /// Overwrite a field with a clone of `value`.
    fn set_dyn(&self, instance: &mut dyn Any, name: &str, value: &dyn Any) -> Result<()> {
        self.find_field(name)?.set_dyn(instance, value)
    }
}

/// Field table for `T`.
pub struct TypeMetadata<T> {
    identity: TypeIdentity,
    fields: Vec<FieldDescriptor>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Any> TypeMetadata<T> {
    /// Empty table.
    pub fn new() -> Self {
        Self {
            identity: TypeIdentity::of::<T>(),
            fields: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Register a field and return its descriptor so attributes can be attached.
    ///
    /// Names must be unique within a table.
    pub fn add_field<V>(
        &mut self,
        name: impl Into<String>,
        selector: FieldRef<T, V>,
    ) -> Result<&mut FieldDescriptor>
    where
        V: Any + Clone,
    {
        let name = name.into();
        if self.contains_field(&name) {
            return Err(ReflectError::DuplicateField {
                ty: self.identity.name(),
                field: name,
            });
        }

        log::trace!(
            "[table] {}: field {} ({})",
            self.identity,
            name,
            std::any::type_name::<V>()
        );
        self.fields.push(FieldDescriptor::new(name, selector));
        let idx = self.fields.len() - 1;
        Ok(&mut self.fields[idx])
    }

    /// Look up a field by name.
    pub fn find_field(&self, name: &str) -> Result<&FieldDescriptor> {
        MetadataView::find_field(self, name)
    }

    /// Clone of the value stored in field `name`.
    pub fn get_field<V: Any + Clone>(&self, instance: &T, name: &str) -> Result<V> {
        self.field_ref::<V>(instance, name).cloned()
    }

    /// Borrow the value stored in field `name`.
    pub fn field_ref<'a, V: Any>(&self, instance: &'a T, name: &str) -> Result<&'a V> {
        self.find_field(name)?.get(instance)
    }

    /// Mutably borrow the value stored in field `name`.
    pub fn field_mut<'a, V: Any>(&self, instance: &'a mut T, name: &str) -> Result<&'a mut V> {
        self.find_field(name)?.get_mut(instance)
    }

    /// Overwrite field `name` with `value`.
    pub fn set_field<V: Any>(&self, instance: &mut T, name: &str, value: V) -> Result<()> {
        self.find_field(name)?.set(instance, value)
    }

    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(FieldDescriptor::name)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T: Any> Default for TypeMetadata<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> MetadataView for TypeMetadata<T> {
    fn identity(&self) -> TypeIdentity {
        self.identity
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

impl fmt::Debug for dyn MetadataView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataView")
            .field("identity", &self.identity())
            .field("fields", &self.fields())
            .finish()
    }
}

impl<T> fmt::Debug for TypeMetadata<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("identity", &self.identity)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests;
