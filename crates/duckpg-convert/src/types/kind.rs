//! Closed enumeration of source engine type kinds.
//!
//! The discriminants are the engine's raw type tags as exposed through its
//! C API, so a raw tag read from a type handle converts with
//! [`SourceKind::try_from`].

use std::fmt;

use crate::error::ConversionError;

/// Kind of a node in the source engine's type tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum SourceKind {
    Invalid = 0,
    Boolean = 1,
    TinyInt = 2,
    SmallInt = 3,
    Integer = 4,
    BigInt = 5,
    UTinyInt = 6,
    USmallInt = 7,
    UInteger = 8,
    UBigInt = 9,
    Float = 10,
    Double = 11,
    Timestamp = 12,
    Date = 13,
    Time = 14,
    Interval = 15,
    HugeInt = 16,
    Varchar = 17,
    Blob = 18,
    Decimal = 19,
    TimestampS = 20,
    TimestampMs = 21,
    TimestampNs = 22,
    Enum = 23,
    List = 24,
    Struct = 25,
    Map = 26,
    Uuid = 27,
    Union = 28,
    Bit = 29,
    TimeTz = 30,
    TimestampTz = 31,
    UHugeInt = 32,
    Array = 33,
}

/// Display names indexed by raw type tag.
const TYPE_NAMES: [&str; 34] = [
    "INVALID",
    "BOOLEAN",
    "TINYINT",
    "SMALLINT",
    "INTEGER",
    "BIGINT",
    "UTINYINT",
    "USMALLINT",
    "UINTEGER",
    "UBIGINT",
    "FLOAT",
    "DOUBLE",
    "TIMESTAMP",
    "DATE",
    "TIME",
    "INTERVAL",
    "HUGEINT",
    "VARCHAR",
    "BLOB",
    "DECIMAL",
    "TIMESTAMP_S",
    "TIMESTAMP_MS",
    "TIMESTAMP_NS",
    "ENUM",
    "LIST",
    "STRUCT",
    "MAP",
    "UUID",
    "UNION",
    "BIT",
    "TIME_TZ",
    "TIMESTAMP_TZ",
    "UHUGEINT",
    "ARRAY",
];

impl SourceKind {
    /// Every kind, in raw tag order.
    pub const ALL: [Self; 34] = [
        Self::Invalid,
        Self::Boolean,
        Self::TinyInt,
        Self::SmallInt,
        Self::Integer,
        Self::BigInt,
        Self::UTinyInt,
        Self::USmallInt,
        Self::UInteger,
        Self::UBigInt,
        Self::Float,
        Self::Double,
        Self::Timestamp,
        Self::Date,
        Self::Time,
        Self::Interval,
        Self::HugeInt,
        Self::Varchar,
        Self::Blob,
        Self::Decimal,
        Self::TimestampS,
        Self::TimestampMs,
        Self::TimestampNs,
        Self::Enum,
        Self::List,
        Self::Struct,
        Self::Map,
        Self::Uuid,
        Self::Union,
        Self::Bit,
        Self::TimeTz,
        Self::TimestampTz,
        Self::UHugeInt,
        Self::Array,
    ];

    /// The engine's raw type tag.
    #[must_use]
    pub const fn type_id(self) -> u32 {
        self as u32
    }

    /// Upper-case SQL name, e.g. `"TIMESTAMP_TZ"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        TYPE_NAMES[self as usize]
    }

    /// Returns true for kinds whose nodes carry children.
    #[must_use]
    pub const fn is_compound(self) -> bool {
        matches!(
            self,
            Self::List | Self::Struct | Self::Map | Self::Union | Self::Array
        )
    }
}

/// Name for a raw type tag.
///
/// Tags outside the known range resolve to `"INVALID"` rather than failing,
/// so diagnostics can always label a node.
#[must_use]
pub fn type_name(type_id: u32) -> &'static str {
    TYPE_NAMES
        .get(type_id as usize)
        .copied()
        .unwrap_or(TYPE_NAMES[0])
}

impl TryFrom<u32> for SourceKind {
    type Error = ConversionError;

    fn try_from(type_id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(type_id as usize)
            .copied()
            .ok_or_else(|| ConversionError::unsupported_type(format!("type id {type_id}")))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
