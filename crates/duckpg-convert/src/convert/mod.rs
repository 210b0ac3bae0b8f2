//! Type conversion from source type trees to target type ids.

pub mod converter;
pub mod resolved;

pub use converter::TypeConverter;
pub use resolved::{ResolvedType, Shape};
