//! DuckDB to PostgreSQL type translation and value extraction.
//!
//! This crate maps the recursive logical types of a DuckDB-style analytical
//! engine onto PostgreSQL-style type OIDs, creating anonymous compound types
//! on demand and interning them by shape, and extracts individual cells of
//! the engine's columnar batches as typed target values.
//!
//! # Features
//!
//! - Closed source kind enum with a static base type table
//! - Post-order conversion with structural interning of map, list, array,
//!   struct, union and decimal types
//! - Thread-safe [`TypeRegistry`] in front of a pluggable [`TargetCatalog`]
//! - Strict, null-propagating value extraction sharing the converter's
//!   traversal
//! - Arrow adapters for record batches exported by the source engine
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use duckpg_convert::catalog::InMemoryCatalog;
//! use duckpg_convert::source::LogicalType;
//! use duckpg_convert::{TypeConverter, TypeRegistry};
//!
//! let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
//! let converter = TypeConverter::new(&registry);
//!
//! let row = LogicalType::structure([
//!     ("a", LogicalType::integer()),
//!     ("b", LogicalType::list(LogicalType::varchar())),
//! ]);
//! let first = converter.convert(Some("row"), &row).unwrap();
//! let again = converter.convert(Some("row"), &row).unwrap();
//! assert_eq!(first, again);
//! assert_eq!(registry.stats().registrations, 2);
//! ```
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod conversion;
pub mod convert;
pub mod error;
pub mod extract;
pub mod registry;
pub mod schema;
pub mod source;
pub mod traits;
pub mod types;

// Re-export main types for convenience
pub use catalog::{CompoundKey, InMemoryCatalog, TargetCatalog};
pub use config::ConverterConfig;
pub use conversion::{Row, RowMaterializer, batch_to_rows};
pub use convert::{ResolvedType, TypeConverter};
pub use error::{ConversionError, Result};
pub use extract::{DataExtractor, Datum, ExtractedValue};
pub use registry::{RegistryStats, TypeRegistry};
pub use schema::{ColumnDescriptor, SchemaMapper, TableDescriptor};
pub use source::{SourceBatch, SourceType, SourceVector};
pub use traits::FromDatum;
pub use types::{Numeric, Oid, SourceKind};
