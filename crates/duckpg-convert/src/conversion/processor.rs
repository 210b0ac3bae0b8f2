//! Streaming materialization of successive batches into target rows.

use arrow_array::RecordBatch;
use arrow_schema::Schema;

use super::batch::{Row, materialize_rows};
use crate::Result;
use crate::convert::ResolvedType;
use crate::extract::DataExtractor;
use crate::schema::{SchemaMapper, TableDescriptor};
use crate::source::ArrowBatch;

/// Materializer that turns a stream of batches sharing one schema into rows.
///
/// Column types are resolved once, when the materializer is created; every
/// batch is then only checked for its column count. Honors the configured
/// row limit per batch.
///
/// # Example
///
/// ```rust,ignore
/// use duckpg_convert::conversion::RowMaterializer;
///
/// let mut materializer = RowMaterializer::new(extractor, &schema)?;
/// for batch in batches {
///     for row in materializer.materialize(&batch)? {
///         // hand the row to the target engine
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RowMaterializer<'r> {
    extractor: DataExtractor<'r>,
    table: TableDescriptor,
    columns: Vec<ResolvedType>,
    rows_materialized: usize,
    batches: usize,
}

impl<'r> RowMaterializer<'r> {
    /// Resolve `schema` and create a materializer for its batches.
    ///
    /// # Errors
    ///
    /// Returns an error if any column type cannot be converted.
    pub fn new(extractor: DataExtractor<'r>, schema: &Schema) -> Result<Self> {
        let table = SchemaMapper::map_schema(extractor.converter(), schema)?;
        let columns = table.columns.iter().map(|c| c.resolved.clone()).collect();
        Ok(Self {
            extractor,
            table,
            columns,
            rows_materialized: 0,
            batches: 0,
        })
    }

    /// Materialize the rows of one batch.
    ///
    /// # Errors
    ///
    /// Returns a schema mismatch if the batch has a different column count,
    /// or the first extraction error.
    pub fn materialize(&mut self, batch: &RecordBatch) -> Result<Vec<Row>> {
        let limit = self.extractor.converter().config().row_limit;
        let source = ArrowBatch::new(batch.clone());
        let rows = materialize_rows(&self.extractor, &self.columns, &source, limit)?;

        if rows.len() < batch.num_rows() {
            tracing::debug!(
                rows = batch.num_rows(),
                limit = rows.len(),
                "batch truncated by row limit"
            );
        }
        self.rows_materialized += rows.len();
        self.batches += 1;
        Ok(rows)
    }

    /// Column layout resolved at creation.
    #[must_use]
    pub const fn table(&self) -> &TableDescriptor {
        &self.table
    }

    /// Total rows materialized so far.
    #[must_use]
    pub const fn rows_materialized(&self) -> usize {
        self.rows_materialized
    }

    /// Number of batches materialized so far.
    #[must_use]
    pub const fn batches(&self) -> usize {
        self.batches
    }
}
