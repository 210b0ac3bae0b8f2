//! Source kinds, target type identifiers, and the mapping between them.

pub mod conversion;
pub mod decimal;
pub mod kind;
pub mod oid;

pub use decimal::{DecimalSpec, Numeric};
pub use kind::{SourceKind, type_name};
pub use oid::{Oid, base_type_oid, base_type_oid_for_tag};
