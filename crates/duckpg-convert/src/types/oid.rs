//! Target type identifiers and the base-type mapping.
//!
//! This module provides the authoritative mapping from source scalar kinds
//! to pre-registered PostgreSQL types.
//!
//! # Type Mapping Table
//!
//! | Source Kind | Target Type | OID | Notes |
//! |-------------|-------------|-----|-------|
//! | BOOLEAN | bool | 16 | |
//! | TINYINT, SMALLINT | int2 | 21 | |
//! | UTINYINT | int2 | 21 | Widened, no unsigned types |
//! | INTEGER, USMALLINT | int4 | 23 | |
//! | BIGINT, UINTEGER | int8 | 20 | |
//! | UBIGINT, HUGEINT, UHUGEINT | numeric | 1700 | Exceeds int8 range |
//! | FLOAT | float4 | 700 | |
//! | DOUBLE | float8 | 701 | |
//! | DECIMAL(w,s) | numeric | 1700 | Interned per (w,s) by the converter |
//! | VARCHAR, ENUM | text | 25 | Enum labels as text |
//! | BLOB | bytea | 17 | |
//! | DATE | date | 1082 | |
//! | TIME | time | 1083 | |
//! | TIME_TZ | timetz | 1266 | |
//! | TIMESTAMP, TIMESTAMP_S/MS/NS | timestamp | 1114 | Microsecond precision |
//! | TIMESTAMP_TZ | timestamptz | 1184 | |
//! | INTERVAL | interval | 1186 | |
//! | UUID | uuid | 2950 | |
//! | BIT | varbit | 1562 | |

use std::fmt;

use super::kind::SourceKind;

/// Identifier of a type registered in the target catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid(u32);

#[allow(missing_docs)]
impl Oid {
    /// The invalid sentinel, `InvalidOid` in the target engine.
    pub const INVALID: Self = Self(0);
    pub const BOOL: Self = Self(16);
    pub const BYTEA: Self = Self(17);
    pub const INT8: Self = Self(20);
    pub const INT2: Self = Self(21);
    pub const INT4: Self = Self(23);
    pub const TEXT: Self = Self(25);
    pub const FLOAT4: Self = Self(700);
    pub const FLOAT8: Self = Self(701);
    pub const DATE: Self = Self(1082);
    pub const TIME: Self = Self(1083);
    pub const TIMESTAMP: Self = Self(1114);
    pub const TIMESTAMPTZ: Self = Self(1184);
    pub const INTERVAL: Self = Self(1186);
    pub const TIMETZ: Self = Self(1266);
    pub const VARBIT: Self = Self(1562);
    pub const NUMERIC: Self = Self(1700);
    pub const UUID: Self = Self(2950);

    /// First OID handed out to user-defined objects.
    pub const FIRST_NORMAL: Self = Self(16384);

    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Oid> for u32 {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

/// Base type table indexed by raw source tag.
///
/// Compound kinds carry `INVALID`: they never resolve through this table.
const BASE_TYPES: [Oid; 34] = [
    Oid::INVALID,     // INVALID
    Oid::BOOL,        // BOOLEAN
    Oid::INT2,        // TINYINT
    Oid::INT2,        // SMALLINT
    Oid::INT4,        // INTEGER
    Oid::INT8,        // BIGINT
    Oid::INT2,        // UTINYINT
    Oid::INT4,        // USMALLINT
    Oid::INT8,        // UINTEGER
    Oid::NUMERIC,     // UBIGINT
    Oid::FLOAT4,      // FLOAT
    Oid::FLOAT8,      // DOUBLE
    Oid::TIMESTAMP,   // TIMESTAMP
    Oid::DATE,        // DATE
    Oid::TIME,        // TIME
    Oid::INTERVAL,    // INTERVAL
    Oid::NUMERIC,     // HUGEINT
    Oid::TEXT,        // VARCHAR
    Oid::BYTEA,       // BLOB
    Oid::NUMERIC,     // DECIMAL
    Oid::TIMESTAMP,   // TIMESTAMP_S
    Oid::TIMESTAMP,   // TIMESTAMP_MS
    Oid::TIMESTAMP,   // TIMESTAMP_NS
    Oid::TEXT,        // ENUM
    Oid::INVALID,     // LIST
    Oid::INVALID,     // STRUCT
    Oid::INVALID,     // MAP
    Oid::UUID,        // UUID
    Oid::INVALID,     // UNION
    Oid::VARBIT,      // BIT
    Oid::TIMETZ,      // TIME_TZ
    Oid::TIMESTAMPTZ, // TIMESTAMP_TZ
    Oid::NUMERIC,     // UHUGEINT
    Oid::INVALID,     // ARRAY
];

/// Pre-registered target type for a scalar source kind.
#[must_use]
pub const fn base_type_oid(kind: SourceKind) -> Oid {
    BASE_TYPES[kind as usize]
}

/// Pre-registered target type for a raw source tag.
///
/// Tags past the end of the table map to the `INVALID` entry (index 0).
#[must_use]
pub fn base_type_oid_for_tag(type_id: u32) -> Oid {
    BASE_TYPES
        .get(type_id as usize)
        .copied()
        .unwrap_or(BASE_TYPES[0])
}

/// Target type name for an OID from the base table.
#[must_use]
pub const fn base_type_name(oid: Oid) -> Option<&'static str> {
    Some(match oid.0 {
        16 => "bool",
        17 => "bytea",
        20 => "int8",
        21 => "int2",
        23 => "int4",
        25 => "text",
        700 => "float4",
        701 => "float8",
        1082 => "date",
        1083 => "time",
        1114 => "timestamp",
        1184 => "timestamptz",
        1186 => "interval",
        1266 => "timetz",
        1562 => "varbit",
        1700 => "numeric",
        2950 => "uuid",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_mappings() {
        assert_eq!(base_type_oid(SourceKind::TinyInt), Oid::INT2);
        assert_eq!(base_type_oid(SourceKind::SmallInt), Oid::INT2);
        assert_eq!(base_type_oid(SourceKind::Integer), Oid::INT4);
        assert_eq!(base_type_oid(SourceKind::BigInt), Oid::INT8);
        assert_eq!(base_type_oid(SourceKind::HugeInt), Oid::NUMERIC);
    }

    #[test]
    fn test_unsigned_widening() {
        assert_eq!(base_type_oid(SourceKind::UTinyInt), Oid::INT2);
        assert_eq!(base_type_oid(SourceKind::USmallInt), Oid::INT4);
        assert_eq!(base_type_oid(SourceKind::UInteger), Oid::INT8);
        assert_eq!(base_type_oid(SourceKind::UBigInt), Oid::NUMERIC);
        assert_eq!(base_type_oid(SourceKind::UHugeInt), Oid::NUMERIC);
    }

    #[test]
    fn test_temporal_mappings() {
        assert_eq!(base_type_oid(SourceKind::Date), Oid::DATE);
        assert_eq!(base_type_oid(SourceKind::TimestampNs), Oid::TIMESTAMP);
        assert_eq!(base_type_oid(SourceKind::TimestampTz), Oid::TIMESTAMPTZ);
        assert_eq!(base_type_oid(SourceKind::TimeTz), Oid::TIMETZ);
    }

    #[test]
    fn test_compound_kinds_are_invalid_in_table() {
        for kind in SourceKind::ALL.iter().filter(|k| k.is_compound()) {
            assert_eq!(base_type_oid(*kind), Oid::INVALID, "{kind}");
        }
    }

    #[test]
    fn test_raw_tag_fallback() {
        assert_eq!(base_type_oid_for_tag(17), Oid::TEXT);
        assert_eq!(base_type_oid_for_tag(34), Oid::INVALID);
        assert_eq!(base_type_oid_for_tag(1000), Oid::INVALID);
    }

    #[test]
    fn test_base_type_names() {
        assert_eq!(base_type_name(Oid::UUID), Some("uuid"));
        assert_eq!(base_type_name(Oid::FIRST_NORMAL), None);
        assert!(!Oid::INVALID.is_valid());
        assert!(Oid::TEXT.is_valid());
    }
}
