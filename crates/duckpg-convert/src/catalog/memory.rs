//! In-memory target catalog.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::TargetCatalog;
use super::key::CompoundKey;
use crate::types::Oid;
use crate::{ConversionError, Result};

/// A registered compound type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Allocated type id
    pub oid: Oid,
    /// Generated type name, `_duck_<category>_<oid>`
    pub name: String,
    /// Structural definition
    pub key: CompoundKey,
}

#[derive(Debug)]
struct CatalogState {
    by_key: HashMap<CompoundKey, Oid>,
    entries: HashMap<Oid, CatalogEntry>,
    next_oid: u32,
}

impl CatalogState {
    fn insert(&mut self, key: &CompoundKey) -> Result<Oid> {
        let oid = Oid::new(self.next_oid);
        self.next_oid = self
            .next_oid
            .checked_add(1)
            .ok_or_else(|| ConversionError::catalog("type id space exhausted"))?;

        let name = format!("_duck_{}_{oid}", key.category().as_str());
        tracing::debug!(%oid, %name, %key, "registered compound type");
        self.by_key.insert(key.clone(), oid);
        self.entries.insert(
            oid,
            CatalogEntry {
                oid,
                name,
                key: key.clone(),
            },
        );
        Ok(oid)
    }
}

/// Thread-safe in-memory catalog.
///
/// Allocates ids upward from [`Oid::FIRST_NORMAL`], the first id the target
/// engine hands to user-defined objects. Registered types live as long as
/// the catalog.
#[derive(Debug)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Create an empty catalog allocating from [`Oid::FIRST_NORMAL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_first_oid(Oid::FIRST_NORMAL)
    }

    /// Create an empty catalog allocating from `first`.
    #[must_use]
    pub fn with_first_oid(first: Oid) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                by_key: HashMap::new(),
                entries: HashMap::new(),
                next_oid: first.value(),
            }),
        }
    }

    /// Look up a registered type by id.
    #[must_use]
    pub fn get(&self, oid: Oid) -> Option<CatalogEntry> {
        self.state.read().entries.get(&oid).cloned()
    }

    /// Number of registered compound types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetCatalog for InMemoryCatalog {
    fn lookup_compound_type(&self, key: &CompoundKey) -> Result<Option<Oid>> {
        Ok(self.state.read().by_key.get(key).copied())
    }

    fn create_compound_type(&self, key: &CompoundKey) -> Result<Oid> {
        let mut state = self.state.write();
        if state.by_key.contains_key(key) {
            return Err(ConversionError::catalog(format!(
                "type already registered for {key}"
            )));
        }
        state.insert(key)
    }

    fn lookup_or_create_compound_type(&self, key: &CompoundKey) -> Result<(Oid, bool)> {
        if let Some(oid) = self.state.read().by_key.get(key) {
            return Ok((*oid, false));
        }

        let mut state = self.state.write();
        // Another thread may have registered the key between the locks.
        if let Some(oid) = state.by_key.get(key) {
            return Ok((*oid, false));
        }
        state.insert(key).map(|oid| (oid, true))
    }
}
