//! Trait definitions for typed value access.
//!
//! - [`sealed`] - Sealed trait pattern for API stability

pub mod sealed;

pub use sealed::FromDatum;
