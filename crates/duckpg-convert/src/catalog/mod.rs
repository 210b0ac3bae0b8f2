//! Target catalog collaborator interface.
//!
//! The target engine's type catalog is consumed through [`TargetCatalog`].
//! [`InMemoryCatalog`] is a thread-safe implementation that allocates
//! identifiers the way the target engine allocates user-defined types.

pub mod key;
pub mod memory;

pub use key::{CompoundCategory, CompoundKey};
pub use memory::{CatalogEntry, InMemoryCatalog};

use std::fmt::Debug;

use crate::Result;
use crate::types::{Oid, SourceKind, base_type_oid};

/// Type catalog of the target engine.
///
/// Implementors register anonymous compound types and resolve base kinds.
/// Shared between threads through [`crate::TypeRegistry`].
pub trait TargetCatalog: Send + Sync + Debug {
    /// Target id of a base (non-compound) kind.
    ///
    /// The default uses the built-in base type table.
    fn base_type_id(&self, kind: SourceKind) -> Oid {
        base_type_oid(kind)
    }

    /// Find an already registered compound type.
    fn lookup_compound_type(&self, key: &CompoundKey) -> Result<Option<Oid>>;

    /// Register a new compound type and return its id.
    fn create_compound_type(&self, key: &CompoundKey) -> Result<Oid>;

    /// Find or register a compound type.
    ///
    /// Returns the id and whether a new type was created. The default runs
    /// lookup then create; implementations should override it when they can
    /// do both under one lock.
    fn lookup_or_create_compound_type(&self, key: &CompoundKey) -> Result<(Oid, bool)> {
        if let Some(oid) = self.lookup_compound_type(key)? {
            return Ok((oid, false));
        }
        self.create_compound_type(key).map(|oid| (oid, true))
    }
}
