//! Single-shot conversion from a `RecordBatch` to target rows.

use arrow_array::RecordBatch;

use crate::Result;
use crate::convert::ResolvedType;
use crate::extract::{DataExtractor, ExtractedValue};
use crate::schema::SchemaMapper;
use crate::source::{ArrowBatch, SourceBatch};

/// One materialized row: a value per column, in column order.
pub type Row = Vec<ExtractedValue>;

/// Convert every row of `batch` to target values.
///
/// Column types are resolved once per call. Any error aborts the whole
/// conversion.
///
/// # Errors
///
/// Returns an error if a column type cannot be converted or any value fails
/// extraction.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
/// use arrow_schema::{DataType, Field, Schema};
/// use duckpg_convert::catalog::InMemoryCatalog;
/// use duckpg_convert::conversion::batch_to_rows;
/// use duckpg_convert::{DataExtractor, TypeConverter, TypeRegistry};
///
/// let schema = Arc::new(Schema::new(vec![
///     Field::new("id", DataType::Int64, false),
///     Field::new("name", DataType::Utf8, true),
/// ]));
/// let columns: Vec<ArrayRef> = vec![
///     Arc::new(Int64Array::from(vec![1, 2])),
///     Arc::new(StringArray::from(vec![Some("duck"), None])),
/// ];
/// let batch = RecordBatch::try_new(schema, columns).unwrap();
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
/// let extractor = DataExtractor::new(TypeConverter::new(&registry));
/// let rows = batch_to_rows(&extractor, &batch).unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0][1].get::<String>().unwrap(), Some("duck".to_owned()));
/// assert!(rows[1][1].is_null());
/// ```
pub fn batch_to_rows(extractor: &DataExtractor<'_>, batch: &RecordBatch) -> Result<Vec<Row>> {
    let table = SchemaMapper::map_schema(extractor.converter(), batch.schema_ref())?;
    let columns: Vec<ResolvedType> = table.columns.into_iter().map(|c| c.resolved).collect();
    materialize_rows(extractor, &columns, &ArrowBatch::new(batch.clone()), None)
}

/// Materialize up to `limit` rows of `batch` with pre-resolved column types.
pub(crate) fn materialize_rows<B: SourceBatch>(
    extractor: &DataExtractor<'_>,
    columns: &[ResolvedType],
    batch: &B,
    limit: Option<usize>,
) -> Result<Vec<Row>> {
    if batch.column_count() != columns.len() {
        return Err(crate::ConversionError::schema_mismatch(
            columns.len(),
            batch.column_count(),
        ));
    }

    let vectors = (0..columns.len())
        .map(|col| batch.vector(col))
        .collect::<Result<Vec<_>>>()?;

    let row_count = limit.map_or(batch.row_count(), |limit| limit.min(batch.row_count()));
    let mut rows = Vec::with_capacity(row_count);
    for row in 0..row_count {
        let values = columns
            .iter()
            .zip(&vectors)
            .map(|(ty, vector)| extractor.extract_resolved(ty, vector, row))
            .collect::<Result<Row>>()?;
        rows.push(values);
    }
    Ok(rows)
}
