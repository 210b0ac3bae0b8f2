//! Boxing of raw scalar payloads into target datums.

use super::temporal::{self, TimestampUnit};
use super::value::Datum;
use crate::convert::ResolvedType;
use crate::source::Scalar;
use crate::types::conversion::type_category;
use crate::types::{Numeric, SourceKind};
use crate::{ConversionError, Result};

fn column_label(ty: &ResolvedType) -> String {
    match ty.label() {
        Some(label) if !label.is_empty() => label.to_owned(),
        _ => ty.kind().name().to_owned(),
    }
}

fn out_of_range(ty: &ResolvedType) -> ConversionError {
    ConversionError::value_conversion(column_label(ty), format!("{} value out of range", ty.kind()))
}

/// Convert one raw payload to the target representation of `ty`.
///
/// # Errors
///
/// Returns a value conversion error if the payload variant does not belong
/// to the node's kind, or a temporal value falls outside the target range.
pub fn to_datum(ty: &ResolvedType, scalar: Scalar<'_>) -> Result<Datum> {
    let kind = ty.kind();
    let datum = match (kind, scalar) {
        (SourceKind::Boolean, Scalar::Boolean(v)) => Datum::Bool(v),
        (SourceKind::TinyInt, Scalar::Int8(v)) => Datum::Int2(i16::from(v)),
        (SourceKind::SmallInt, Scalar::Int16(v)) => Datum::Int2(v),
        (SourceKind::Integer, Scalar::Int32(v)) => Datum::Int4(v),
        (SourceKind::BigInt, Scalar::Int64(v)) => Datum::Int8(v),
        (SourceKind::HugeInt, Scalar::Int128(v)) => Datum::Numeric(Numeric::from_integer(v)),
        (SourceKind::UTinyInt, Scalar::UInt8(v)) => Datum::Int2(i16::from(v)),
        (SourceKind::USmallInt, Scalar::UInt16(v)) => Datum::Int4(i32::from(v)),
        (SourceKind::UInteger, Scalar::UInt32(v)) => Datum::Int8(i64::from(v)),
        (SourceKind::UBigInt, Scalar::UInt64(v)) => Datum::Numeric(Numeric::from_integer(v)),
        (SourceKind::UHugeInt, Scalar::UInt128(v)) => Datum::Numeric(Numeric::from_integer(v)),
        (SourceKind::Float, Scalar::Float32(v)) => Datum::Float4(v),
        (SourceKind::Double, Scalar::Float64(v)) => Datum::Float8(v),
        (SourceKind::Decimal, Scalar::Decimal(v)) => {
            let scale = ty.decimal().map_or(0, |spec| spec.scale());
            Datum::Numeric(Numeric::new(v, scale))
        }
        (SourceKind::Varchar | SourceKind::Enum, Scalar::Str(s)) => Datum::Text(s.to_owned()),
        (SourceKind::Blob, Scalar::Bytes(b)) => Datum::Bytea(b.to_vec()),
        (SourceKind::Bit, Scalar::Bytes(b)) => Datum::Bit(bit_string(ty, b)?),
        (SourceKind::Bit, Scalar::Str(s)) if s.bytes().all(|c| c == b'0' || c == b'1') => {
            Datum::Bit(s.to_owned())
        }
        (SourceKind::Uuid, Scalar::Uuid(b)) => Datum::Uuid(b),
        (SourceKind::Date, Scalar::Date(days)) => {
            Datum::Date(temporal::date_to_target(days).ok_or_else(|| out_of_range(ty))?)
        }
        (SourceKind::Time, Scalar::Time(micros)) => Datum::Time(micros),
        (SourceKind::TimeTz, Scalar::TimeTz { micros, offset_seconds }) => {
            Datum::TimeTz { micros, offset_seconds }
        }
        (
            SourceKind::Timestamp
            | SourceKind::TimestampS
            | SourceKind::TimestampMs
            | SourceKind::TimestampNs,
            Scalar::Timestamp(raw),
        ) => Datum::Timestamp(timestamp(ty, raw)?),
        (SourceKind::TimestampTz, Scalar::TimestampTz(micros)) => {
            Datum::TimestampTz(temporal::micros_to_target(micros).ok_or_else(|| out_of_range(ty))?)
        }
        (SourceKind::Interval, Scalar::Interval { months, days, micros }) => {
            Datum::Interval { months, days, micros }
        }
        (_, scalar) => {
            return Err(ConversionError::value_conversion(
                column_label(ty),
                format!(
                    "unexpected {} payload for {kind} ({})",
                    scalar.variant_name(),
                    type_category(kind)
                ),
            ));
        }
    };
    Ok(datum)
}

fn timestamp(ty: &ResolvedType, raw: i64) -> Result<i64> {
    let unit = match ty.kind() {
        SourceKind::TimestampS => TimestampUnit::Seconds,
        SourceKind::TimestampMs => TimestampUnit::Millis,
        SourceKind::TimestampNs => TimestampUnit::Nanos,
        _ => TimestampUnit::Micros,
    };
    temporal::to_unix_micros(raw, unit)
        .and_then(temporal::micros_to_target)
        .ok_or_else(|| out_of_range(ty))
}

/// Render a packed bit string.
///
/// The first byte holds the number of padding bits at the front of the
/// first data byte.
fn bit_string(ty: &ResolvedType, bytes: &[u8]) -> Result<String> {
    let Some((&padding, data)) = bytes.split_first() else {
        return Err(ConversionError::value_conversion(column_label(ty), "empty bit string"));
    };
    if padding >= 8 || (data.is_empty() && padding > 0) {
        return Err(ConversionError::value_conversion(
            column_label(ty),
            format!("invalid bit string padding {padding}"),
        ));
    }
    let bits = data
        .iter()
        .flat_map(|&byte| (0..8_u8).rev().map(move |i| if (byte >> i) & 1 == 1 { '1' } else { '0' }))
        .skip(usize::from(padding))
        .collect();
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::convert::TypeConverter;
    use crate::source::LogicalType;
    use crate::types::Oid;
    use crate::TypeRegistry;

    fn resolve(ty: &LogicalType) -> ResolvedType {
        let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
        TypeConverter::new(&registry).resolve(Some("c"), ty).unwrap()
    }

    fn scalar(kind: SourceKind) -> ResolvedType {
        resolve(&LogicalType::scalar(kind))
    }

    #[test]
    fn test_unsigned_widening() {
        assert_eq!(
            to_datum(&scalar(SourceKind::UTinyInt), Scalar::UInt8(255)).unwrap(),
            Datum::Int2(255)
        );
        assert_eq!(
            to_datum(&scalar(SourceKind::UInteger), Scalar::UInt32(u32::MAX)).unwrap(),
            Datum::Int8(i64::from(u32::MAX))
        );
        assert_eq!(
            to_datum(&scalar(SourceKind::UBigInt), Scalar::UInt64(u64::MAX)).unwrap(),
            Datum::Numeric(Numeric::from_integer(u64::MAX))
        );
    }

    #[test]
    fn test_decimal_scale_from_type() {
        let ty = resolve(&LogicalType::decimal(10, 2));
        let datum = to_datum(&ty, Scalar::Decimal(-12_345)).unwrap();
        let Datum::Numeric(value) = datum else {
            panic!("expected numeric");
        };
        assert_eq!(value.to_string(), "-123.45");
    }

    #[test]
    fn test_epoch_shift() {
        assert_eq!(
            to_datum(&scalar(SourceKind::Date), Scalar::Date(10_958)).unwrap(),
            Datum::Date(1)
        );
        assert_eq!(
            to_datum(&scalar(SourceKind::TimestampS), Scalar::Timestamp(946_684_801)).unwrap(),
            Datum::Timestamp(1_000_000)
        );
        assert_eq!(
            to_datum(&scalar(SourceKind::TimestampNs), Scalar::Timestamp(946_684_800_000_001_500))
                .unwrap(),
            Datum::Timestamp(1)
        );
        assert_eq!(
            to_datum(&scalar(SourceKind::TimestampTz), Scalar::TimestampTz(0)).unwrap(),
            Datum::TimestampTz(-946_684_800_000_000)
        );
    }

    #[test]
    fn test_timestamp_overflow() {
        let err = to_datum(&scalar(SourceKind::TimestampS), Scalar::Timestamp(i64::MAX)).unwrap_err();
        assert!(err.is_value_conversion());
    }

    #[test]
    fn test_payload_mismatch() {
        let err = to_datum(&scalar(SourceKind::Integer), Scalar::Str("1")).unwrap_err();
        assert!(err.is_value_conversion());
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_bit_string() {
        let ty = scalar(SourceKind::Bit);
        assert_eq!(
            to_datum(&ty, Scalar::Bytes(&[3, 0b0001_0110])).unwrap(),
            Datum::Bit("10110".into())
        );
        assert_eq!(to_datum(&ty, Scalar::Str("101")).unwrap(), Datum::Bit("101".into()));
        assert!(to_datum(&ty, Scalar::Bytes(&[])).is_err());
        assert!(to_datum(&ty, Scalar::Bytes(&[9, 0])).is_err());
        assert!(to_datum(&ty, Scalar::Str("12")).is_err());
    }

    #[test]
    fn test_enum_as_text() {
        let ty = scalar(SourceKind::Enum);
        assert_eq!(ty.type_id(), Oid::TEXT);
        assert_eq!(
            to_datum(&ty, Scalar::Str("duck")).unwrap(),
            Datum::Text("duck".into())
        );
    }
}
