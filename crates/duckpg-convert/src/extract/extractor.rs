//! Per-cell value extraction from columnar batches.

use super::scalar::to_datum;
use super::value::{Datum, ExtractedValue};
use crate::convert::{ResolvedType, Shape, TypeConverter};
use crate::source::{SourceBatch, SourceType, SourceVector};
use crate::{ConversionError, Result};

/// Extracts single cells of a batch as tagged target values.
///
/// The type tree is resolved first, so an unsupported kind anywhere in the
/// tree fails before any vector is read. Any error aborts the whole
/// extraction; partially built compound values are never returned.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use arrow_array::{ArrayRef, Int32Array, RecordBatch};
/// use arrow_schema::{DataType, Field, Schema};
/// use duckpg_convert::catalog::InMemoryCatalog;
/// use duckpg_convert::source::{ArrowBatch, ArrowType};
/// use duckpg_convert::types::Oid;
/// use duckpg_convert::{DataExtractor, TypeConverter, TypeRegistry};
///
/// let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int32, true)]));
/// let column: ArrayRef = Arc::new(Int32Array::from(vec![Some(7), None]));
/// let batch = ArrowBatch::new(RecordBatch::try_new(schema, vec![column]).unwrap());
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
/// let extractor = DataExtractor::new(TypeConverter::new(&registry));
/// let node = ArrowType::new(DataType::Int32);
///
/// let value = extractor.extract(&node, &batch, 0, 0).unwrap();
/// assert_eq!(value.type_id, Oid::INT4);
/// assert_eq!(value.get::<i32>().unwrap(), Some(7));
/// assert!(extractor.extract(&node, &batch, 1, 0).unwrap().is_null());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DataExtractor<'r> {
    converter: TypeConverter<'r>,
}

impl<'r> DataExtractor<'r> {
    /// Create an extractor that types values with `converter`.
    #[must_use]
    pub const fn new(converter: TypeConverter<'r>) -> Self {
        Self { converter }
    }

    /// The converter used for type ids.
    #[must_use]
    pub const fn converter(&self) -> &TypeConverter<'r> {
        &self.converter
    }

    /// Extract the value at (`row`, `col`) of `batch`, typed by `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` or `col` is out of range, the type tree
    /// cannot be converted, the vectors disagree with the type tree, or a
    /// payload cannot be represented in the target encoding.
    pub fn extract<T, B>(&self, node: &T, batch: &B, row: usize, col: usize) -> Result<ExtractedValue>
    where
        T: SourceType,
        B: SourceBatch,
    {
        let row_count = batch.row_count();
        if row >= row_count {
            return Err(ConversionError::row_out_of_range(row, row_count));
        }
        let column_count = batch.column_count();
        if col >= column_count {
            return Err(ConversionError::column_out_of_range(col, column_count));
        }

        let resolved = self.converter.resolve(None, node)?;
        let vector = batch.vector(col)?;
        self.extract_resolved(&resolved, &vector, row)
    }

    /// Extract `row` of `vector` for an already resolved type.
    ///
    /// Lets callers that read many rows resolve the column type once.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract), minus conversion errors.
    pub fn extract_resolved<V: SourceVector>(
        &self,
        ty: &ResolvedType,
        vector: &V,
        row: usize,
    ) -> Result<ExtractedValue> {
        if row >= vector.len() {
            return Err(ConversionError::row_out_of_range(row, vector.len()));
        }
        if !vector.is_valid(row) {
            return Ok(ExtractedValue::null(ty.type_id()));
        }

        let datum = match ty.shape() {
            Shape::Scalar | Shape::Decimal(_) => to_datum(ty, vector.read_scalar(row)?)?,
            Shape::List { element, .. } => {
                let entry = vector.list_entry(row)?;
                let elements = vector.child(0)?;
                let values = entry
                    .rows()
                    .map(|r| self.extract_resolved(element, &elements, r))
                    .collect::<Result<Vec<_>>>()?;
                Datum::Array(values)
            }
            Shape::Map { key, value } => {
                let entry = vector.list_entry(row)?;
                let entries = vector.child(0)?;
                let keys = entries.child(0)?;
                let values = entries.child(1)?;
                let pairs = entry
                    .rows()
                    .map(|r| {
                        Ok((
                            self.extract_resolved(key, &keys, r)?,
                            self.extract_resolved(value, &values, r)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Datum::Map(pairs)
            }
            Shape::Struct(members) => {
                if vector.child_count() < members.len() {
                    return Err(ConversionError::schema_mismatch(
                        members.len(),
                        vector.child_count(),
                    ));
                }
                let mut fields = Vec::with_capacity(members.len());
                for (i, member) in members.iter().enumerate() {
                    let child = vector.child(i)?;
                    fields.push((
                        member.name().to_owned(),
                        self.extract_resolved(member, &child, row)?,
                    ));
                }
                Datum::Record(fields)
            }
            Shape::Union(members) => {
                let entry = vector.union_entry(row)?;
                let member = members.get(entry.member).ok_or_else(|| {
                    ConversionError::schema_mismatch(entry.member + 1, members.len())
                })?;
                let child = vector.child(entry.member)?;
                Datum::Union {
                    tag: entry.member,
                    name: member.name().to_owned(),
                    value: Box::new(self.extract_resolved(member, &child, entry.row)?),
                }
            }
        };

        Ok(ExtractedValue::new(ty.type_id(), datum))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_array::builder::{Int32Builder, ListBuilder, MapBuilder, StringBuilder};
    use arrow_array::{ArrayRef, Int32Array, RecordBatch, StringArray, StructArray};
    use arrow_schema::{DataType, Field, Fields, Schema};

    use super::*;
    use crate::TypeRegistry;
    use crate::catalog::InMemoryCatalog;
    use crate::source::{ArrowBatch, ArrowType, ArrowVector, LogicalType};
    use crate::types::Oid;

    fn batch_of(name: &str, column: ArrayRef) -> ArrowBatch {
        let field = Field::new(name, column.data_type().clone(), true);
        let schema = Arc::new(Schema::new(vec![field]));
        ArrowBatch::new(RecordBatch::try_new(schema, vec![column]).unwrap())
    }

    #[test]
    fn test_range_checks_before_type_work() {
        let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
        let extractor = DataExtractor::new(TypeConverter::new(&registry));
        let batch = batch_of("n", Arc::new(Int32Array::from(vec![1])));
        // An unconvertible node still reports the range error first.
        let bad = LogicalType::from_type_id(99);

        assert!(extractor.extract(&bad, &batch, 1, 0).unwrap_err().is_row_out_of_range());
        assert!(extractor.extract(&bad, &batch, 0, 1).unwrap_err().is_column_out_of_range());
        assert!(extractor.extract(&bad, &batch, 0, 0).unwrap_err().is_unsupported_type());
    }

    #[test]
    fn test_list_values() {
        let mut builder = ListBuilder::new(StringBuilder::new());
        builder.values().append_value("a");
        builder.values().append_null();
        builder.append(true);
        builder.append(false);
        let batch = batch_of("tags", Arc::new(builder.finish()));

        let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
        let extractor = DataExtractor::new(TypeConverter::new(&registry));
        let node = ArrowType::new(batch.schema().field(0).data_type().clone());

        let value = extractor.extract(&node, &batch, 0, 0).unwrap();
        let elements = value.elements().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].get::<String>().unwrap(), Some("a".to_owned()));
        assert!(elements[1].is_null());
        assert_eq!(elements[1].type_id, Oid::TEXT);

        let null = extractor.extract(&node, &batch, 1, 0).unwrap();
        assert!(null.is_null());
        assert_eq!(null.type_id, value.type_id);
    }

    #[test]
    fn test_map_values() {
        let mut builder = MapBuilder::new(None, StringBuilder::new(), Int32Builder::new());
        builder.keys().append_value("x");
        builder.values().append_value(1);
        builder.keys().append_value("y");
        builder.values().append_null();
        builder.append(true).unwrap();
        let batch = batch_of("m", Arc::new(builder.finish()));

        let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
        let extractor = DataExtractor::new(TypeConverter::new(&registry));
        let node = batch.column_type(0).unwrap();

        let value = extractor.extract(&node, &batch, 0, 0).unwrap();
        let Datum::Map(pairs) = &value.datum else {
            panic!("expected map");
        };
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.get::<String>().unwrap(), Some("x".to_owned()));
        assert_eq!(pairs[0].1.get::<i32>().unwrap(), Some(1));
        assert!(pairs[1].1.is_null());
    }

    #[test]
    fn test_struct_schema_mismatch() {
        let column: ArrayRef = Arc::new(StructArray::from(vec![(
            Arc::new(Field::new("a", DataType::Int32, true)),
            Arc::new(Int32Array::from(vec![1])) as ArrayRef,
        )]));
        let vector = ArrowVector::new(column);

        let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
        let converter = TypeConverter::new(&registry);
        let extractor = DataExtractor::new(converter);
        let wider = ArrowType::new(DataType::Struct(Fields::from(vec![
            Field::new("a", DataType::Int32, true),
            Field::new("b", DataType::Utf8, true),
        ])));
        let resolved = converter.resolve(None, &wider).unwrap();

        let err = extractor.extract_resolved(&resolved, &vector, 0).unwrap_err();
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_struct_record_order() {
        let column: ArrayRef = Arc::new(StructArray::from(vec![
            (
                Arc::new(Field::new("z", DataType::Utf8, true)),
                Arc::new(StringArray::from(vec!["last"])) as ArrayRef,
            ),
            (
                Arc::new(Field::new("a", DataType::Int32, true)),
                Arc::new(Int32Array::from(vec![5])) as ArrayRef,
            ),
        ]));
        let batch = batch_of("s", column);

        let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
        let extractor = DataExtractor::new(TypeConverter::new(&registry));
        let value = extractor
            .extract(&batch.column_type(0).unwrap(), &batch, 0, 0)
            .unwrap();
        let Datum::Record(fields) = &value.datum else {
            panic!("expected record");
        };
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(value.field("a").unwrap().get::<i64>().unwrap(), Some(5));
    }
}
