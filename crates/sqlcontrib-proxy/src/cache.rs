//! Process-wide cache of synthesized proxy types.
//!
//! Synthesizing a [`ProxyType`] walks the accessor table and validates the
//! whole shape, so it happens at most once per entity type. The cache is
//! keyed by `TypeId` and holds the lock across synthesis: concurrent first
//! requests for the same type block on each other and all receive the same
//! `Arc`. A failed synthesis is not remembered; the next request retries.

use crate::proxy::ProxyType;
use sqlcontrib_core::{Entity, Error, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

type Slot = Arc<dyn Any + Send + Sync>;

/// Thread-safe, grow-only map from entity type to its proxy type.
#[derive(Debug, Default)]
pub struct ProxyTypeCache {
    types: Mutex<HashMap<TypeId, Slot>>,
    syntheses: AtomicU64,
}

impl ProxyTypeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by [`ProxyFactory::global`](crate::ProxyFactory::global).
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ProxyTypeCache> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Return the proxy type for `T`, running `synthesize` if none is cached.
    ///
    /// `synthesize` runs with the cache locked, so it must not call back into
    /// this cache.
    #[allow(clippy::result_large_err)]
    pub fn get_or_create<T, F>(&self, synthesize: F) -> Result<Arc<ProxyType<T>>>
    where
        T: Entity,
        F: FnOnce() -> Result<ProxyType<T>>,
    {
        let mut types = self.lock();
        if let Some(slot) = types.get(&TypeId::of::<T>()) {
            tracing::trace!(entity = std::any::type_name::<T>(), "Proxy type cache hit");
            return downcast::<T>(Arc::clone(slot));
        }

        let proxy_type = Arc::new(synthesize()?);
        self.syntheses.fetch_add(1, Ordering::Relaxed);
        types.insert(TypeId::of::<T>(), Arc::clone(&proxy_type) as Slot);
        tracing::debug!(
            entity = std::any::type_name::<T>(),
            cached = types.len(),
            "Synthesized proxy type"
        );
        Ok(proxy_type)
    }

    /// The cached proxy type for `T`, without synthesizing.
    pub fn get<T: Entity>(&self) -> Option<Arc<ProxyType<T>>> {
        let slot = self.lock().get(&TypeId::of::<T>()).cloned()?;
        downcast::<T>(slot).ok()
    }

    pub fn contains<T: Entity>(&self) -> bool {
        self.lock().contains_key(&TypeId::of::<T>())
    }

    /// Number of cached proxy types.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// How many successful syntheses this cache has run.
    pub fn synthesis_count(&self) -> u64 {
        self.syntheses.load(Ordering::Relaxed)
    }

    // Entries are inserted whole, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Slot>> {
        self.types.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[allow(clippy::result_large_err)]
fn downcast<T: Entity>(slot: Slot) -> Result<Arc<ProxyType<T>>> {
    slot.downcast::<ProxyType<T>>().map_err(|_| {
        Error::Custom(format!(
            "proxy cache entry for `{}` has the wrong type",
            std::any::type_name::<T>()
        ))
    })
}
