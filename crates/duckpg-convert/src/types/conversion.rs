//! Kind classification helpers.
//!
//! Groups source kinds the way the extractor and diagnostics need them.

use super::kind::SourceKind;

/// Check if a kind is a signed or unsigned integer of any width.
#[must_use]
pub const fn is_integer(kind: SourceKind) -> bool {
    matches!(
        kind,
        SourceKind::TinyInt
            | SourceKind::SmallInt
            | SourceKind::Integer
            | SourceKind::BigInt
            | SourceKind::HugeInt
            | SourceKind::UTinyInt
            | SourceKind::USmallInt
            | SourceKind::UInteger
            | SourceKind::UBigInt
            | SourceKind::UHugeInt
    )
}

/// Check if a kind is a temporal type.
#[must_use]
pub const fn is_temporal(kind: SourceKind) -> bool {
    matches!(
        kind,
        SourceKind::Date
            | SourceKind::Time
            | SourceKind::TimeTz
            | SourceKind::Timestamp
            | SourceKind::TimestampS
            | SourceKind::TimestampMs
            | SourceKind::TimestampNs
            | SourceKind::TimestampTz
            | SourceKind::Interval
    )
}

/// Get the category name of a kind.
#[must_use]
pub const fn type_category(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Invalid => "Invalid",
        SourceKind::Boolean => "Boolean",
        SourceKind::Float | SourceKind::Double => "Float",
        SourceKind::Decimal => "Decimal",
        SourceKind::Varchar | SourceKind::Enum => "String",
        SourceKind::Blob | SourceKind::Bit | SourceKind::Uuid => "Binary",
        SourceKind::List
        | SourceKind::Array
        | SourceKind::Struct
        | SourceKind::Map
        | SourceKind::Union => "Compound",
        k if is_integer(k) => "Integer",
        k if is_temporal(k) => "Temporal",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_integer() {
        assert!(is_integer(SourceKind::Integer));
        assert!(is_integer(SourceKind::UHugeInt));
        assert!(!is_integer(SourceKind::Double));
        assert!(!is_integer(SourceKind::Decimal));
    }

    #[test]
    fn test_is_temporal() {
        assert!(is_temporal(SourceKind::Date));
        assert!(is_temporal(SourceKind::TimestampNs));
        assert!(is_temporal(SourceKind::Interval));
        assert!(!is_temporal(SourceKind::Varchar));
    }

    #[test]
    fn test_type_category() {
        assert_eq!(type_category(SourceKind::BigInt), "Integer");
        assert_eq!(type_category(SourceKind::Decimal), "Decimal");
        assert_eq!(type_category(SourceKind::Enum), "String");
        assert_eq!(type_category(SourceKind::TimeTz), "Temporal");
        assert_eq!(type_category(SourceKind::Map), "Compound");
    }
}
