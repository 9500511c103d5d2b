// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute descriptors.
//!
//! An attribute is an arbitrary typed value attached to a field at
//! registration time. The descriptor only holds a provider; the provider owns
//! the value and hands out shared handles to it.

use crate::type_identity::TypeIdentity;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Shared, type-erased attribute value.
pub type AttributeHandle = Arc<dyn Any + Send + Sync>;

type Provider = dyn Fn() -> AttributeHandle + Send + Sync;

/// Pairs an attribute type with the provider producing its value.
#[derive(Clone)]
pub struct AttributeDescriptor {
    ty: TypeIdentity,
    provider: Arc<Provider>,
}

impl AttributeDescriptor {
    /// Attribute backed by an already-built value.
    ///
    /// Every `resolve()` returns the same handle.
    pub fn new<A: Any + Send + Sync>(value: A) -> Self {
        let handle: AttributeHandle = Arc::new(value);
        Self {
            ty: TypeIdentity::of::<A>(),
            provider: Arc::new(move || Arc::clone(&handle)),
        }
    }

    /// Attribute built on first `resolve()` and memoized afterwards.
    pub fn lazy<A: Any + Send + Sync>(init: fn() -> A) -> Self {
        let cell: OnceLock<AttributeHandle> = OnceLock::new();
        Self {
            ty: TypeIdentity::of::<A>(),
            provider: Arc::new(move || {
                Arc::clone(cell.get_or_init(|| -> AttributeHandle { Arc::new(init()) }))
            }),
        }
    }

    /// Attribute backed by an arbitrary provider.
    ///
    /// Singleton semantics only hold if the provider returns the same handle
    /// on every call.
    pub fn from_provider<A, F>(provider: F) -> Self
    where
        A: Any + Send + Sync,
        F: Fn() -> Arc<A> + Send + Sync + 'static,
    {
        Self {
            ty: TypeIdentity::of::<A>(),
            provider: Arc::new(move || -> AttributeHandle { provider() }),
        }
    }

    /// Type of the attribute value.
    pub fn type_identity(&self) -> TypeIdentity {
        self.ty
    }

    /// Invoke the provider.
    pub fn resolve(&self) -> AttributeHandle {
        (self.provider)()
    }

    /// Resolve and downcast to `A`; `None` if `A` is not the attribute type.
    pub fn downcast<A: Any + Send + Sync>(&self) -> Option<Arc<A>> {
        if !self.ty.is::<A>() {
            return None;
        }
        self.resolve().downcast::<A>().ok()
    }
}

impl fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}
