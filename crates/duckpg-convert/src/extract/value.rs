//! Target-side value representation.

use crate::Result;
use crate::traits::FromDatum;
use crate::types::{Numeric, Oid};

/// One value in the target engine's representation.
///
/// Dates count days and timestamps count microseconds from 2000-01-01.
/// Unsigned source integers are widened to the next signed width, or to
/// [`Datum::Numeric`] past 32 bits.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// SQL NULL
    Null,
    /// `bool`
    Bool(bool),
    /// `int2`
    Int2(i16),
    /// `int4`
    Int4(i32),
    /// `int8`
    Int8(i64),
    /// `float4`
    Float4(f32),
    /// `float8`
    Float8(f64),
    /// `numeric`
    Numeric(Numeric),
    /// `text`
    Text(String),
    /// `bytea`
    Bytea(Vec<u8>),
    /// `date`, days since 2000-01-01
    Date(i32),
    /// `time`, microseconds since midnight
    Time(i64),
    /// `timetz`, microseconds since midnight and UTC offset in seconds east
    TimeTz {
        /// Microseconds since midnight
        micros: i64,
        /// UTC offset in seconds, positive east of Greenwich
        offset_seconds: i32,
    },
    /// `timestamp`, microseconds since 2000-01-01
    Timestamp(i64),
    /// `timestamptz`, microseconds since 2000-01-01 UTC
    TimestampTz(i64),
    /// `interval`
    Interval {
        /// Whole months
        months: i32,
        /// Whole days
        days: i32,
        /// Remaining microseconds
        micros: i64,
    },
    /// `uuid`
    Uuid([u8; 16]),
    /// `varbit`, as a string of `0` and `1`
    Bit(String),
    /// List or array elements in order
    Array(Vec<ExtractedValue>),
    /// Struct fields in declaration order
    Record(Vec<(String, ExtractedValue)>),
    /// Map entries in order
    Map(Vec<(ExtractedValue, ExtractedValue)>),
    /// The active member of a union
    Union {
        /// Index of the active member
        tag: usize,
        /// Name of the active member
        name: String,
        /// Member value
        value: Box<ExtractedValue>,
    },
}

impl Datum {
    /// Short name of the variant, for error messages.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int2(_) => "int2",
            Self::Int4(_) => "int4",
            Self::Int8(_) => "int8",
            Self::Float4(_) => "float4",
            Self::Float8(_) => "float8",
            Self::Numeric(_) => "numeric",
            Self::Text(_) => "text",
            Self::Bytea(_) => "bytea",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::TimeTz { .. } => "timetz",
            Self::Timestamp(_) => "timestamp",
            Self::TimestampTz(_) => "timestamptz",
            Self::Interval { .. } => "interval",
            Self::Uuid(_) => "uuid",
            Self::Bit(_) => "varbit",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
            Self::Map(_) => "map",
            Self::Union { .. } => "union",
        }
    }
}

/// A value tagged with its target type id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue {
    /// Target type id of the value
    pub type_id: Oid,
    /// The value itself
    pub datum: Datum,
}

impl ExtractedValue {
    /// Create a tagged value.
    #[must_use]
    pub const fn new(type_id: Oid, datum: Datum) -> Self {
        Self { type_id, datum }
    }

    /// A NULL of the given type.
    #[must_use]
    pub const fn null(type_id: Oid) -> Self {
        Self::new(type_id, Datum::Null)
    }

    /// Returns true if the value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.datum, Datum::Null)
    }

    /// Typed access to a scalar value.
    ///
    /// Returns `Ok(None)` for NULL.
    ///
    /// # Errors
    ///
    /// Returns a value conversion error if the datum does not fit `T`.
    pub fn get<T: FromDatum>(&self) -> Result<Option<T>> {
        if self.is_null() {
            return Ok(None);
        }
        T::from_datum(&self.datum).map(Some)
    }

    /// Struct field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match &self.datum {
            Datum::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// List or array elements.
    #[must_use]
    pub fn elements(&self) -> Option<&[Self]> {
        match &self.datum {
            Datum::Array(elements) => Some(elements),
            _ => None,
        }
    }
}
