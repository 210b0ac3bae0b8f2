//! Connection-lifetime interning of anonymous compound types.
//!
//! The registry sits in front of a [`TargetCatalog`] and caches every
//! structural key it has resolved, so repeated conversions of the same shape
//! hit memory instead of the catalog. Check-then-insert runs under one lock:
//! two threads interning the same key always observe one id.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::Result;
use crate::catalog::{CompoundKey, TargetCatalog};
use crate::types::{Oid, SourceKind};

/// Interning statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Lookups answered from the local cache.
    pub hits: u64,
    /// Lookups that went to the catalog.
    pub misses: u64,
    /// New types created in the catalog.
    pub registrations: u64,
    /// Keys currently cached.
    pub entries: usize,
}

impl RegistryStats {
    /// Fraction of lookups answered locally.
    ///
    /// Returns 0.0 if nothing has been looked up yet.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    cache: HashMap<CompoundKey, Oid>,
    hits: u64,
    misses: u64,
    registrations: u64,
}

/// Cache of compound type ids in front of a target catalog.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use duckpg_convert::catalog::{CompoundKey, InMemoryCatalog};
/// use duckpg_convert::types::Oid;
/// use duckpg_convert::TypeRegistry;
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
/// let first = registry.intern(&CompoundKey::list(Oid::INT4)).unwrap();
/// let again = registry.intern(&CompoundKey::list(Oid::INT4)).unwrap();
/// assert_eq!(first, again);
/// assert_eq!(registry.stats().registrations, 1);
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    catalog: Arc<dyn TargetCatalog>,
    state: Mutex<RegistryState>,
}

impl TypeRegistry {
    /// Create an empty registry over `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<dyn TargetCatalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// The catalog behind this registry.
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn TargetCatalog> {
        &self.catalog
    }

    /// Target id of a base kind.
    #[must_use]
    pub fn base_type_id(&self, kind: SourceKind) -> Oid {
        self.catalog.base_type_id(kind)
    }

    /// Return the id for `key`, registering a new type on first sight.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if the catalog fails the lookup or
    /// registration. Nothing is cached in that case.
    pub fn intern(&self, key: &CompoundKey) -> Result<Oid> {
        let mut state = self.state.lock();
        if let Some(&oid) = state.cache.get(key) {
            state.hits += 1;
            return Ok(oid);
        }

        state.misses += 1;
        let (oid, created) = self.catalog.lookup_or_create_compound_type(key)?;
        if created {
            state.registrations += 1;
            tracing::debug!(%oid, %key, "interned new compound type");
        } else {
            tracing::trace!(%oid, %key, "compound type found in catalog");
        }
        state.cache.insert(key.clone(), oid);
        Ok(oid)
    }

    /// Cached id for `key`, without touching the catalog.
    #[must_use]
    pub fn get(&self, key: &CompoundKey) -> Option<Oid> {
        self.state.lock().cache.get(key).copied()
    }

    /// Snapshot of the interning statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let state = self.state.lock();
        RegistryStats {
            hits: state.hits,
            misses: state.misses,
            registrations: state.registrations,
            entries: state.cache.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::ConversionError;
    use crate::catalog::InMemoryCatalog;

    #[derive(Debug, Default)]
    struct FailingCatalog {
        calls: AtomicUsize,
    }

    impl TargetCatalog for FailingCatalog {
        fn lookup_compound_type(&self, _key: &CompoundKey) -> Result<Option<Oid>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        fn create_compound_type(&self, _key: &CompoundKey) -> Result<Oid> {
            Err(ConversionError::catalog("read-only catalog"))
        }
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::new(Arc::new(InMemoryCatalog::new()))
    }

    #[test]
    fn test_intern_idempotent() {
        let registry = registry();
        let key = CompoundKey::map(Oid::TEXT, Oid::INT4);
        let first = registry.intern(&key).unwrap();
        let second = registry.intern(&key).unwrap();
        assert_eq!(first, second);

        let stats = registry.stats();
        assert_eq!(stats.registrations, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_distinct_keys_distinct_ids() {
        let registry = registry();
        let a = registry.intern(&CompoundKey::list(Oid::INT4)).unwrap();
        let b = registry.intern(&CompoundKey::list(Oid::INT8)).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.stats().registrations, 2);
    }

    #[test]
    fn test_catalog_hit_is_not_a_registration() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let key = CompoundKey::list(Oid::BOOL);
        let existing = catalog.create_compound_type(&key).unwrap();

        let registry = TypeRegistry::new(catalog);
        assert_eq!(registry.intern(&key).unwrap(), existing);
        assert_eq!(registry.stats().registrations, 0);
        assert_eq!(registry.get(&key), Some(existing));
    }

    #[test]
    fn test_catalog_failure_not_cached() {
        let catalog = Arc::new(FailingCatalog::default());
        let registry = TypeRegistry::new(catalog.clone());
        let key = CompoundKey::list(Oid::INT2);

        assert!(registry.intern(&key).unwrap_err().is_catalog_error());
        assert!(registry.intern(&key).is_err());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.get(&key), None);
        assert_eq!(registry.stats().entries, 0);
    }

    #[test]
    fn test_hit_rate() {
        assert!(RegistryStats::default().hit_rate().abs() < f64::EPSILON);
        let stats = RegistryStats {
            hits: 3,
            misses: 1,
            registrations: 1,
            entries: 1,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_concurrent_intern() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let shared = registry.intern(&CompoundKey::list(Oid::TEXT)).unwrap();
                    let own = registry
                        .intern(&CompoundKey::array(Oid::INT4, i))
                        .unwrap();
                    (shared, own)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.iter().all(|(shared, _)| *shared == results[0].0));
        assert_eq!(registry.stats().registrations, 9);
    }
}
