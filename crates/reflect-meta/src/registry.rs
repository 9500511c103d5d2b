// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metadata registry with one-time, per-type table construction.
//!
//! # Architecture
//!
//! ```text
//! Registry
//! +-- tables:   RwLock<HashMap<TypeIdentity, Entry>>       (published tables)
//! +-- guards:   DashMap<TypeIdentity, Arc<ReentrantMutex>> (one build guard per type)
//! +-- routines: DashMap<TypeIdentity, ErasedRoutine>       (runtime registration)
//!
//! Entry
//! +-- typed: Arc<TypeMetadata<T>> as Arc<dyn Any>
//! +-- view:  same allocation as Arc<dyn MetadataView>
//! ```
//!
//! # Build protocol
//!
//! 1. Read-lock `tables`; a hit returns immediately.
//! 2. Fetch the type's guard and lock it; re-check `tables`.
//! 3. Run the registration routine with no table lock held, so routines may
//!    ask for metadata of *other* types.
//! 4. Publish the finished table under the write lock.
//!
//! Exactly one routine run succeeds per type, and no caller ever sees a
//! partially built table. A failed run publishes nothing; the next caller
//! retries. A routine asking for its own type gets
//! [`ReflectError::RecursiveBuild`] instead of deadlocking.

use crate::builder::{MetadataBuilder, Reflect, Routine};
use crate::config::RegistryConfig;
use crate::error::{ReflectError, Result};
use crate::table::{MetadataView, TypeMetadata};
use crate::type_identity::TypeIdentity;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use parking_lot::{ReentrantMutex, RwLock};
use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Published table, stored twice behind the same allocation.
#[derive(Clone)]
struct Entry {
    typed: Arc<dyn Any + Send + Sync>,
    view: Arc<dyn MetadataView>,
}

impl Entry {
    fn new<T: Any>(metadata: TypeMetadata<T>) -> Self {
        let table = Arc::new(metadata);
        Self {
            typed: Arc::clone(&table) as Arc<dyn Any + Send + Sync>,
            view: table,
        }
    }

    fn downcast<T: Any>(self) -> Option<Arc<TypeMetadata<T>>> {
        self.typed.downcast::<TypeMetadata<T>>().ok()
    }
}

type ErasedRoutine = Arc<dyn Fn(RegistryConfig) -> Result<Entry> + Send + Sync>;
type BuildGuard = Arc<ReentrantMutex<Cell<bool>>>;

/// Clears the "building" flag even if the routine panics.
struct Building<'a>(&'a Cell<bool>);

impl<'a> Building<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for Building<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Registry counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Lookups served from a published table.
    pub hits: u64,
    /// Lookups that had to run a routine.
    pub misses: u64,
    /// Successful builds.
    pub builds: u64,
    /// Failed builds.
    pub failures: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
}

/// Mapping from type identity to its metadata table.
pub struct Registry {
    config: RegistryConfig,
    tables: RwLock<HashMap<TypeIdentity, Entry>>,
    guards: DashMap<TypeIdentity, BuildGuard>,
    routines: DashMap<TypeIdentity, ErasedRoutine>,
    counters: Counters,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(HashMap::new()),
            guards: DashMap::new(),
            routines: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Process-wide registry, created with the default configuration on first use.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Install the process-wide registry with `config`.
    ///
    /// Returns `false` if it already exists (config left unchanged).
    pub fn init_global(config: RegistryConfig) -> bool {
        let mut installed = false;
        GLOBAL.get_or_init(|| {
            installed = true;
            Registry::with_config(config)
        });
        installed
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Install a runtime registration routine for `T`.
    pub fn register_routine<T: Any>(&self, routine: Routine<T>) -> Result<()> {
        let ty = TypeIdentity::of::<T>();
        match self.routines.entry(ty) {
            MapEntry::Occupied(_) => Err(ReflectError::DuplicateRoutine { ty: ty.name() }),
            MapEntry::Vacant(slot) => {
                let erased: ErasedRoutine = Arc::new(move |config| {
                    MetadataBuilder::run(config, routine).map(Entry::new)
                });
                slot.insert(erased);
                log::trace!("[registry] routine installed for {}", ty);
                Ok(())
            }
        }
    }

    /// Install `T`'s [`Reflect`] routine so erased callers can reach `T`
    /// through [`lookup`](Self::lookup) before anyone calls
    /// [`metadata_of`](Self::metadata_of).
    pub fn register<T: Reflect>(&self) -> Result<()> {
        self.register_routine::<T>(T::reflect)
    }

    /// Table for a type carrying its own [`Reflect`] routine.
    pub fn metadata_of<T: Reflect>(&self) -> Result<Arc<TypeMetadata<T>>> {
        let ty = TypeIdentity::of::<T>();
        let entry = self.get_or_build(ty, |config| {
            MetadataBuilder::run(config, T::reflect).map(Entry::new)
        })?;
        Self::typed(ty, entry)
    }

    /// Table for `T`, built from its runtime routine.
    pub fn metadata<T: Any>(&self) -> Result<Arc<TypeMetadata<T>>> {
        let ty = TypeIdentity::of::<T>();
        let entry = self.get_or_build(ty, |config| self.run_routine(ty, config))?;
        Self::typed(ty, entry)
    }

    /// Erased table for `ty`, built from its runtime routine if needed.
    ///
    /// A [`Reflect`] type that was neither built nor [`register`](Self::register)ed
    /// is unknown here: an identity alone cannot name its routine.
    pub fn lookup(&self, ty: TypeIdentity) -> Result<Arc<dyn MetadataView>> {
        let entry = self.get_or_build(ty, |config| self.run_routine(ty, config))?;
        Ok(entry.view)
    }

    /// Whether a table for `ty` has been published.
    pub fn contains(&self, ty: TypeIdentity) -> bool {
        self.tables.read().contains_key(&ty)
    }

    /// Whether a runtime routine exists for `ty`.
    pub fn has_routine(&self, ty: TypeIdentity) -> bool {
        self.routines.contains_key(&ty)
    }

    /// Types with a published table.
    pub fn registered_types(&self) -> Vec<TypeIdentity> {
        let mut types: Vec<_> = self.tables.read().keys().copied().collect();
        types.sort_by_key(|ty| ty.name());
        types
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            builds: self.counters.builds.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    fn typed<T: Any>(ty: TypeIdentity, entry: Entry) -> Result<Arc<TypeMetadata<T>>> {
        // Entries are keyed by the identity of the type they were built for.
        entry
            .downcast::<T>()
            .ok_or(ReflectError::UnknownType { ty: ty.name() })
    }

    fn run_routine(&self, ty: TypeIdentity, config: RegistryConfig) -> Result<Entry> {
        let routine = self
            .routines
            .get(&ty)
            .map(|r| Arc::clone(r.value()))
            .ok_or(ReflectError::UnknownType { ty: ty.name() })?;
        routine(config)
    }

    fn peek(&self, ty: TypeIdentity) -> Option<Entry> {
        self.tables.read().get(&ty).cloned()
    }

    fn get_or_build<F>(&self, ty: TypeIdentity, build: F) -> Result<Entry>
    where
        F: FnOnce(RegistryConfig) -> Result<Entry>,
    {
        if let Some(hit) = self.peek(ty) {
            self.record_hit(ty);
            return Ok(hit);
        }

        let guard: BuildGuard = Arc::clone(
            self.guards
                .entry(ty)
                .or_insert_with(|| Arc::new(ReentrantMutex::new(Cell::new(false))))
                .value(),
        );
        let flag = guard.lock();
        if flag.get() {
            return Err(ReflectError::RecursiveBuild { ty: ty.name() });
        }

        if let Some(hit) = self.peek(ty) {
            self.record_hit(ty);
            return Ok(hit);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let built = {
            let _building = Building::enter(&flag);
            build(self.config)
        };

        match built {
            Ok(entry) => {
                self.tables.write().insert(ty, entry.clone());
                self.counters.builds.fetch_add(1, Ordering::Relaxed);
                log::debug!(
                    "[registry] built {} ({} fields) in {:?}",
                    ty,
                    entry.view.fields().len(),
                    start.elapsed()
                );
                drop(flag);
                self.guards.remove(&ty);
                Ok(entry)
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                log::debug!("[registry] build of {} failed: {}", ty, e);
                Err(e)
            }
        }
    }

    fn record_hit(&self, ty: TypeIdentity) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        log::trace!("[registry] hit {}", ty);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("types", &self.registered_types())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
