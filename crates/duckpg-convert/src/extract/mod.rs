//! Value extraction from columnar batches into target values.
//!
//! - [`extractor`] - the recursive per-cell walker
//! - [`scalar`] - boxing of raw payloads per kind
//! - [`temporal`] - epoch shifts
//! - [`value`] - [`Datum`] and [`ExtractedValue`]

pub mod extractor;
pub mod scalar;
pub mod temporal;
pub mod value;

pub use extractor::DataExtractor;
pub use value::{Datum, ExtractedValue};
