//! Schema mapping from Arrow schemas to target table descriptors.

pub mod mapping;

pub use mapping::{ColumnDescriptor, SchemaMapper, TableDescriptor};
