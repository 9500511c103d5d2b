// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors and field selectors.
//!
//! A [`FieldDescriptor`] owns three accessors built once from a
//! [`FieldRef`]: a getter, a mutable getter and a cloning setter. They only
//! ever see borrowed `dyn Any` handles, so a handle can never outlive the
//! instance it points into. Handles of the wrong concrete type are caught by
//! the downcast inside the accessor and reported as errors.

use crate::attribute::{AttributeDescriptor, AttributeHandle};
use crate::config::DuplicateAttributes;
use crate::error::{ReflectError, Result};
use crate::type_identity::{check_type_match, TypeIdentity};
use std::any::{self, Any, TypeId};
use std::fmt;
use std::sync::Arc;

type Getter = dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync;
type GetterMut = dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync;
type Setter = dyn Fn(&mut dyn Any, &dyn Any) -> Option<()> + Send + Sync;

/// Capability addressing one field of `T` whose declared type is `V`.
///
/// Usually built from two non-capturing closures:
///
/// ```
/// use reflect_meta::FieldRef;
///
/// struct Point { x: i32 }
///
/// let x = FieldRef::new(|p: &Point| &p.x, |p: &mut Point| &mut p.x);
/// let mut p = Point { x: 3 };
/// *x.get_mut(&mut p) += 1;
/// assert_eq!(*x.get(&p), 4);
/// ```
pub struct FieldRef<T, V> {
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T, V> FieldRef<T, V> {
    pub const fn new(get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'a>(&self, owner: &'a T) -> &'a V {
        (self.get)(owner)
    }

    pub fn get_mut<'a>(&self, owner: &'a mut T) -> &'a mut V {
        (self.get_mut)(owner)
    }
}

impl<T, V> Clone for FieldRef<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for FieldRef<T, V> {}

impl<T, V> fmt::Debug for FieldRef<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldRef<{}, {}>",
            any::type_name::<T>(),
            any::type_name::<V>()
        )
    }
}

// The bounds pin the higher-ranked signatures onto the closures.
fn erase_getter<F>(f: F) -> Box<Getter>
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

fn erase_getter_mut<F>(f: F) -> Box<GetterMut>
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

fn erase_setter<F>(f: F) -> Box<Setter>
where
    F: Fn(&mut dyn Any, &dyn Any) -> Option<()> + Send + Sync + 'static,
{
    Box::new(f)
}

fn handle_id(handle: &dyn Any) -> TypeId {
    <dyn Any as Any>::type_id(handle)
}

// `dyn Any` carries no type name, only its id.
fn describe(id: TypeId) -> String {
    format!("<erased {:?}>", id)
}

/// Metadata record for one field: name, types, accessors, attributes.
pub struct FieldDescriptor {
    name: String,
    owner: TypeIdentity,
    ty: TypeIdentity,
    getter: Box<Getter>,
    getter_mut: Box<GetterMut>,
    setter: Box<Setter>,
    attributes: Vec<AttributeDescriptor>,
}

impl FieldDescriptor {
    /// Build the accessors for `selector`.
    pub(crate) fn new<T, V>(name: String, selector: FieldRef<T, V>) -> Self
    where
        T: Any,
        V: Any + Clone,
    {
        let FieldRef { get, get_mut } = selector;

        let getter = erase_getter(move |instance| {
            instance
                .downcast_ref::<T>()
                .map(|owner| get(owner) as &dyn Any)
        });

        let getter_mut = erase_getter_mut(move |instance| {
            instance
                .downcast_mut::<T>()
                .map(|owner| get_mut(owner) as &mut dyn Any)
        });

        let setter = erase_setter(move |instance, value| {
            let value = value.downcast_ref::<V>()?;
            let owner = instance.downcast_mut::<T>()?;
            *get_mut(owner) = value.clone();
            Some(())
        });

        Self {
            name,
            owner: TypeIdentity::of::<T>(),
            ty: TypeIdentity::of::<V>(),
            getter,
            getter_mut,
            setter,
            attributes: Vec::new(),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type the field belongs to.
    pub fn owner(&self) -> TypeIdentity {
        self.owner
    }

    /// Declared type of the field.
    pub fn type_identity(&self) -> TypeIdentity {
        self.ty
    }

    /// Attributes in registration order.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// First attribute whose type is `ty`, resolved.
    pub fn find_attribute(&self, ty: TypeIdentity) -> Option<AttributeHandle> {
        self.attributes
            .iter()
            .find(|attr| attr.type_identity() == ty)
            .map(AttributeDescriptor::resolve)
    }

    /// Typed variant of [`find_attribute`](Self::find_attribute).
    pub fn find_attribute_of<A: Any + Send + Sync>(&self) -> Option<Arc<A>> {
        self.find_attribute(TypeIdentity::of::<A>())?
            .downcast::<A>()
            .ok()
    }

    pub fn has_attribute<A: Any + Send + Sync>(&self) -> bool {
        let ty = TypeIdentity::of::<A>();
        self.attributes.iter().any(|attr| attr.type_identity() == ty)
    }

    /// Like [`find_attribute_of`](Self::find_attribute_of), failing with
    /// [`ReflectError::AttributeNotFound`] when absent.
    pub fn require_attribute<A: Any + Send + Sync>(&self) -> Result<Arc<A>> {
        self.find_attribute_of::<A>()
            .ok_or_else(|| ReflectError::AttributeNotFound {
                field: self.name.clone(),
                attribute: any::type_name::<A>(),
            })
    }

    pub(crate) fn attach(
        &mut self,
        attribute: AttributeDescriptor,
        policy: DuplicateAttributes,
    ) -> Result<()> {
        let ty = attribute.type_identity();
        if self.attributes.iter().any(|attr| attr.type_identity() == ty) {
            match policy {
                DuplicateAttributes::Reject => {
                    return Err(ReflectError::DuplicateAttribute {
                        field: self.name.clone(),
                        attribute: ty.name(),
                    });
                }
                DuplicateAttributes::KeepFirst => {
                    log::trace!(
                        "[field] {}: dropping duplicate attribute {}",
                        self.name,
                        ty
                    );
                    return Ok(());
                }
            }
        }
        self.attributes.push(attribute);
        Ok(())
    }

    fn instance_mismatch(&self, actual: String) -> ReflectError {
        ReflectError::InstanceMismatch {
            field: self.name.clone(),
            expected: self.owner.name(),
            actual,
        }
    }

    fn check_owner<T: Any>(&self) -> Result<()> {
        if self.owner.is::<T>() {
            Ok(())
        } else {
            Err(self.instance_mismatch(any::type_name::<T>().to_string()))
        }
    }

    /// Read the field through an erased instance handle.
    ///
    /// Error messages for a foreign handle show its `TypeId` only, since
    /// `dyn Any` does not expose the type name.
    pub fn get_dyn<'a>(&self, instance: &'a dyn Any) -> Result<&'a dyn Any> {
        let actual = handle_id(instance);
        (self.getter)(instance).ok_or_else(|| self.instance_mismatch(describe(actual)))
    }

    /// Mutable access through an erased instance handle.
    pub fn get_dyn_mut<'a>(&self, instance: &'a mut dyn Any) -> Result<&'a mut dyn Any> {
        let actual = handle_id(instance);
        (self.getter_mut)(instance).ok_or_else(|| self.instance_mismatch(describe(actual)))
    }

    /// Overwrite the field with a clone of `value`.
    ///
    /// The value type is checked before the instance. As with
    /// [`get_dyn`](Self::get_dyn), a rejected handle is reported by `TypeId`;
    /// the declared type is always reported by name.
    pub fn set_dyn(&self, instance: &mut dyn Any, value: &dyn Any) -> Result<()> {
        let requested = handle_id(value);
        if requested != self.ty.id() {
            return Err(ReflectError::TypeMismatch {
                field: self.name.clone(),
                declared: self.ty.name(),
                requested: describe(requested),
            });
        }
        let actual = handle_id(instance);
        (self.setter)(instance, value).ok_or_else(|| self.instance_mismatch(describe(actual)))
    }

    /// Typed read; `V` must be the declared type.
    pub fn get<'a, T: Any, V: Any>(&self, instance: &'a T) -> Result<&'a V> {
        self.check_owner::<T>()?;
        check_type_match(self.ty, &self.name, TypeIdentity::of::<V>())?;
        self.get_dyn(instance)?
            .downcast_ref::<V>()
            .ok_or_else(|| self.instance_mismatch(any::type_name::<T>().to_string()))
    }

    /// Typed mutable access; `V` must be the declared type.
    pub fn get_mut<'a, T: Any, V: Any>(&self, instance: &'a mut T) -> Result<&'a mut V> {
        self.check_owner::<T>()?;
        check_type_match(self.ty, &self.name, TypeIdentity::of::<V>())?;
        let actual = any::type_name::<T>();
        self.get_dyn_mut(instance)?
            .downcast_mut::<V>()
            .ok_or_else(|| self.instance_mismatch(actual.to_string()))
    }

    /// Typed write; the value is moved into the field.
    pub fn set<T: Any, V: Any>(&self, instance: &mut T, value: V) -> Result<()> {
        *self.get_mut::<T, V>(instance)? = value;
        Ok(())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("ty", &self.ty)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
