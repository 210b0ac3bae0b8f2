//! Arrow schema to target table descriptor mapping.
//!
//! Converts the schema of a source result into the column catalog entries
//! the target engine needs: one type id per column, with every anonymous
//! compound type registered along the way.

use arrow_schema::Schema;

use crate::Result;
use crate::convert::{ResolvedType, TypeConverter};
use crate::source::ArrowType;
use crate::types::Oid;

/// One column of a target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Target type id
    pub type_id: Oid,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Full resolved type tree
    pub resolved: ResolvedType,
}

/// Column layout of a target table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Columns in source order
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Type ids in column order.
    #[must_use]
    pub fn type_ids(&self) -> Vec<Oid> {
        self.columns.iter().map(|c| c.type_id).collect()
    }
}

/// Schema mapper for converting Arrow schemas to target table descriptors.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use arrow_schema::{DataType, Field, Schema};
/// use duckpg_convert::catalog::InMemoryCatalog;
/// use duckpg_convert::types::Oid;
/// use duckpg_convert::{SchemaMapper, TypeConverter, TypeRegistry};
///
/// let schema = Schema::new(vec![
///     Field::new("id", DataType::Int64, false),
///     Field::new("name", DataType::Utf8, true),
/// ]);
/// let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
/// let table = SchemaMapper::map_schema(&TypeConverter::new(&registry), &schema).unwrap();
/// assert_eq!(table.type_ids(), vec![Oid::INT8, Oid::TEXT]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaMapper;

impl SchemaMapper {
    /// Convert every field of `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first conversion error; columns are converted in order.
    pub fn map_schema(converter: &TypeConverter<'_>, schema: &Schema) -> Result<TableDescriptor> {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                let resolved = converter.resolve(Some(field.name()), &ArrowType::from_field(field))?;
                Ok(ColumnDescriptor {
                    name: field.name().clone(),
                    type_id: resolved.type_id(),
                    nullable: field.is_nullable(),
                    resolved,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(columns = columns.len(), "mapped schema");
        Ok(TableDescriptor { columns })
    }
}
