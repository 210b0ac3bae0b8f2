//! Typed reads of extracted datums.
//!
//! [`FromDatum`] is sealed: the set of Rust types it covers is fixed by
//! this crate, so new conversions can be added without breaking callers.

use crate::extract::Datum;
use crate::types::{Numeric, Oid};
use crate::{ConversionError, Result};

pub(crate) mod private {
    pub trait Sealed {}
}

/// Rust types that can be read out of a [`Datum`].
///
/// Integer targets accept narrower integer datums and reject values that
/// do not fit.
pub trait FromDatum: private::Sealed + Sized {
    /// Target type id this Rust type corresponds to.
    fn target_type() -> Oid;

    /// Convert a datum to this type.
    ///
    /// # Errors
    ///
    /// Returns an error if the datum has a different type or is out of range.
    fn from_datum(datum: &Datum) -> Result<Self>;
}

fn unexpected(target: &str, datum: &Datum) -> ConversionError {
    ConversionError::value_conversion(target, format!("unexpected datum: {}", datum.variant_name()))
}

fn out_of_range(target: &str) -> ConversionError {
    ConversionError::value_conversion(target, "value out of range")
}

// ═══════════════════════════════════════════════════════════════════════════
// Sealed Implementations
// ═══════════════════════════════════════════════════════════════════════════

impl private::Sealed for bool {}
impl FromDatum for bool {
    fn target_type() -> Oid {
        Oid::BOOL
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Bool(v) => Ok(*v),
            other => Err(unexpected("bool", other)),
        }
    }
}

impl private::Sealed for i16 {}
impl FromDatum for i16 {
    fn target_type() -> Oid {
        Oid::INT2
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Int2(v) => Ok(*v),
            Datum::Int4(v) => Self::try_from(*v).map_err(|_| out_of_range("i16")),
            Datum::Int8(v) => Self::try_from(*v).map_err(|_| out_of_range("i16")),
            other => Err(unexpected("i16", other)),
        }
    }
}

impl private::Sealed for i32 {}
impl FromDatum for i32 {
    fn target_type() -> Oid {
        Oid::INT4
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Int2(v) => Ok(Self::from(*v)),
            Datum::Int4(v) => Ok(*v),
            Datum::Int8(v) => Self::try_from(*v).map_err(|_| out_of_range("i32")),
            other => Err(unexpected("i32", other)),
        }
    }
}

impl private::Sealed for i64 {}
impl FromDatum for i64 {
    fn target_type() -> Oid {
        Oid::INT8
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Int2(v) => Ok(Self::from(*v)),
            Datum::Int4(v) => Ok(Self::from(*v)),
            Datum::Int8(v) => Ok(*v),
            other => Err(unexpected("i64", other)),
        }
    }
}

impl private::Sealed for f32 {}
impl FromDatum for f32 {
    fn target_type() -> Oid {
        Oid::FLOAT4
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Float4(v) => Ok(*v),
            #[allow(clippy::cast_possible_truncation)]
            Datum::Float8(v) => Ok(*v as Self),
            other => Err(unexpected("f32", other)),
        }
    }
}

impl private::Sealed for f64 {}
impl FromDatum for f64 {
    fn target_type() -> Oid {
        Oid::FLOAT8
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Float4(v) => Ok(Self::from(*v)),
            Datum::Float8(v) => Ok(*v),
            other => Err(unexpected("f64", other)),
        }
    }
}

impl private::Sealed for String {}
impl FromDatum for String {
    fn target_type() -> Oid {
        Oid::TEXT
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Text(s) | Datum::Bit(s) => Ok(s.clone()),
            Datum::Numeric(n) => Ok(n.to_string()),
            other => Err(unexpected("String", other)),
        }
    }
}

impl private::Sealed for Vec<u8> {}
impl FromDatum for Vec<u8> {
    fn target_type() -> Oid {
        Oid::BYTEA
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Bytea(b) => Ok(b.clone()),
            Datum::Uuid(b) => Ok(b.to_vec()),
            other => Err(unexpected("Vec<u8>", other)),
        }
    }
}

impl private::Sealed for Numeric {}
impl FromDatum for Numeric {
    fn target_type() -> Oid {
        Oid::NUMERIC
    }

    fn from_datum(datum: &Datum) -> Result<Self> {
        match datum {
            Datum::Numeric(n) => Ok(n.clone()),
            Datum::Int2(v) => Ok(Self::from_integer(*v)),
            Datum::Int4(v) => Ok(Self::from_integer(*v)),
            Datum::Int8(v) => Ok(Self::from_integer(*v)),
            other => Err(unexpected("Numeric", other)),
        }
    }
}
