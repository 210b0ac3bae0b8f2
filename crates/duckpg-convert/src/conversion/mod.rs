//! Batch-level conversion helpers.
//!
//! - [`batch`] - single-shot `RecordBatch` to rows
//! - [`processor`] - streaming materialization with a fixed schema

pub mod batch;
pub mod processor;

pub use batch::{Row, batch_to_rows};
pub use processor::RowMaterializer;
