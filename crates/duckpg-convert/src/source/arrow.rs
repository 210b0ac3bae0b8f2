//! Arrow adapters for the source collaborator traits.
//!
//! The source engine exports result chunks as Apache Arrow, so these
//! adapters let the converter and extractor run directly on `RecordBatch`es.
//!
//! # Type Mapping Table
//!
//! | Arrow Type | Source Kind | Notes |
//! |------------|-------------|-------|
//! | Boolean | BOOLEAN | |
//! | Int8/16/32/64 | TINYINT/SMALLINT/INTEGER/BIGINT | |
//! | UInt8/16/32/64 | UTINYINT/USMALLINT/UINTEGER/UBIGINT | |
//! | Float32/64 | FLOAT/DOUBLE | |
//! | Decimal128(p,s) | DECIMAL(p,s) | Negative scale rejected |
//! | Utf8, LargeUtf8, Utf8View | VARCHAR | |
//! | Binary, LargeBinary, BinaryView | BLOB | |
//! | FixedSizeBinary(16) | UUID | |
//! | Date32, Date64 | DATE | |
//! | Time32, Time64 | TIME | Normalized to microseconds |
//! | Timestamp(s/ms/us/ns, None) | TIMESTAMP_S/MS/TIMESTAMP/NS | |
//! | Timestamp(_, Some(tz)) | TIMESTAMP_TZ | Normalized to microseconds |
//! | Interval(MonthDayNano) | INTERVAL | |
//! | Dictionary(_, Utf8) | ENUM | |
//! | List, LargeList | LIST | |
//! | FixedSizeList | ARRAY | |
//! | Struct | STRUCT | |
//! | Map | MAP | |
//! | Union (sparse, dense) | UNION | |

use std::fmt;
use std::sync::Arc;

use arrow_array::cast::AsArray;
use arrow_array::types::{
    Date32Type, Date64Type, Decimal128Type, Float32Type, Float64Type, Int8Type, Int16Type,
    Int32Type, Int64Type, IntervalMonthDayNanoType, Time32MillisecondType, Time32SecondType,
    Time64MicrosecondType, Time64NanosecondType, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use arrow_array::{Array, ArrayRef, RecordBatch};
use arrow_buffer::IntervalMonthDayNano;
use arrow_schema::{DataType, Field, FieldRef, IntervalUnit, SchemaRef, TimeUnit};

use super::{ListEntry, Scalar, SourceBatch, SourceType, SourceVector, UnionEntry};
use crate::types::SourceKind;
use crate::{ConversionError, Result};

const MICROS_PER_SECOND: i64 = 1_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

// ═══════════════════════════════════════════════════════════════════════════
// Type handles
// ═══════════════════════════════════════════════════════════════════════════

/// An Arrow `DataType` viewed as a source type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowType {
    data_type: DataType,
}

impl ArrowType {
    /// Wrap an Arrow data type.
    #[must_use]
    pub const fn new(data_type: DataType) -> Self {
        Self { data_type }
    }

    /// Type node for a schema field.
    #[must_use]
    pub fn from_field(field: &Field) -> Self {
        Self::new(field.data_type().clone())
    }

    /// Returns the wrapped Arrow type.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn member(&self, index: usize) -> Result<&FieldRef> {
        let found = match &self.data_type {
            DataType::Struct(fields) => fields.get(index),
            DataType::Union(fields, _) => fields.iter().nth(index).map(|(_, field)| field),
            _ => None,
        };
        found.ok_or_else(|| ConversionError::schema_mismatch(index + 1, self.child_count()))
    }

    fn map_entry(&self, index: usize) -> Result<Self> {
        if let DataType::Map(entries, _) = &self.data_type
            && let DataType::Struct(fields) = entries.data_type()
            && fields.len() == 2
        {
            return Ok(Self::from_field(&fields[index]));
        }
        Err(ConversionError::value_conversion(
            self.data_type.to_string(),
            "type is not a map of key/value entries",
        ))
    }
}

impl From<DataType> for ArrowType {
    fn from(data_type: DataType) -> Self {
        Self::new(data_type)
    }
}

impl fmt::Display for ArrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data_type)
    }
}

impl SourceType for ArrowType {
    #[allow(clippy::match_same_arms)]
    fn kind(&self) -> Result<SourceKind> {
        Ok(match &self.data_type {
            DataType::Boolean => SourceKind::Boolean,
            DataType::Int8 => SourceKind::TinyInt,
            DataType::Int16 => SourceKind::SmallInt,
            DataType::Int32 => SourceKind::Integer,
            DataType::Int64 => SourceKind::BigInt,
            DataType::UInt8 => SourceKind::UTinyInt,
            DataType::UInt16 => SourceKind::USmallInt,
            DataType::UInt32 => SourceKind::UInteger,
            DataType::UInt64 => SourceKind::UBigInt,
            DataType::Float32 => SourceKind::Float,
            DataType::Float64 => SourceKind::Double,
            DataType::Decimal128(..) => SourceKind::Decimal,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => SourceKind::Varchar,
            DataType::Binary | DataType::LargeBinary | DataType::BinaryView => SourceKind::Blob,
            DataType::FixedSizeBinary(16) => SourceKind::Uuid,
            DataType::Date32 | DataType::Date64 => SourceKind::Date,
            DataType::Time32(_) | DataType::Time64(_) => SourceKind::Time,
            DataType::Timestamp(_, Some(_)) => SourceKind::TimestampTz,
            DataType::Timestamp(TimeUnit::Second, None) => SourceKind::TimestampS,
            DataType::Timestamp(TimeUnit::Millisecond, None) => SourceKind::TimestampMs,
            DataType::Timestamp(TimeUnit::Microsecond, None) => SourceKind::Timestamp,
            DataType::Timestamp(TimeUnit::Nanosecond, None) => SourceKind::TimestampNs,
            DataType::Interval(IntervalUnit::MonthDayNano) => SourceKind::Interval,
            DataType::Dictionary(_, value)
                if matches!(
                    value.as_ref(),
                    DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
                ) =>
            {
                SourceKind::Enum
            }
            DataType::List(_) | DataType::LargeList(_) => SourceKind::List,
            DataType::FixedSizeList(..) => SourceKind::Array,
            DataType::Struct(_) => SourceKind::Struct,
            DataType::Map(..) => SourceKind::Map,
            DataType::Union(..) => SourceKind::Union,
            other => return Err(ConversionError::unsupported_type(other.to_string())),
        })
    }

    fn child_count(&self) -> usize {
        match &self.data_type {
            DataType::Struct(fields) => fields.len(),
            DataType::Union(fields, _) => fields.len(),
            _ => 0,
        }
    }

    fn child_name(&self, index: usize) -> Result<String> {
        self.member(index).map(|field| field.name().clone())
    }

    fn child_type(&self, index: usize) -> Result<Self> {
        self.member(index).map(|field| Self::from_field(field))
    }

    fn list_child_type(&self) -> Result<Self> {
        match &self.data_type {
            DataType::List(element)
            | DataType::LargeList(element)
            | DataType::FixedSizeList(element, _) => Ok(Self::from_field(element)),
            other => Err(ConversionError::value_conversion(
                other.to_string(),
                "type has no element type",
            )),
        }
    }

    fn map_key_type(&self) -> Result<Self> {
        self.map_entry(0)
    }

    fn map_value_type(&self) -> Result<Self> {
        self.map_entry(1)
    }

    fn decimal_width_scale(&self) -> Result<(u8, u8)> {
        match &self.data_type {
            DataType::Decimal128(precision, scale) => {
                let scale = u8::try_from(*scale).map_err(|_| {
                    ConversionError::unsupported_type(format!(
                        "{} (negative scale)",
                        self.data_type
                    ))
                })?;
                Ok((*precision, scale))
            }
            other => Err(ConversionError::value_conversion(
                other.to_string(),
                "type has no width/scale",
            )),
        }
    }

    fn array_size(&self) -> Option<usize> {
        match &self.data_type {
            DataType::FixedSizeList(_, size) => usize::try_from(*size).ok(),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Vectors
// ═══════════════════════════════════════════════════════════════════════════

/// An Arrow array viewed as a source vector.
#[derive(Debug, Clone)]
pub struct ArrowVector {
    array: ArrayRef,
}

impl ArrowVector {
    /// Wrap an Arrow array.
    #[must_use]
    pub const fn new(array: ArrayRef) -> Self {
        Self { array }
    }

    /// Returns the wrapped array.
    #[must_use]
    pub const fn array(&self) -> &ArrayRef {
        &self.array
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.array.len() {
            return Err(ConversionError::row_out_of_range(row, self.array.len()));
        }
        Ok(())
    }

    fn layout_error(&self, wanted: &str) -> ConversionError {
        ConversionError::value_conversion(
            self.array.data_type().to_string(),
            format!("vector has no {wanted}"),
        )
    }

    fn timestamp_micros(&self, unit: TimeUnit, row: usize) -> Result<i64> {
        let array = &self.array;
        let micros = match unit {
            TimeUnit::Second => array
                .as_primitive::<TimestampSecondType>()
                .value(row)
                .checked_mul(MICROS_PER_SECOND),
            TimeUnit::Millisecond => array
                .as_primitive::<TimestampMillisecondType>()
                .value(row)
                .checked_mul(1_000),
            TimeUnit::Microsecond => Some(array.as_primitive::<TimestampMicrosecondType>().value(row)),
            TimeUnit::Nanosecond => Some(
                array
                    .as_primitive::<TimestampNanosecondType>()
                    .value(row)
                    .div_euclid(1_000),
            ),
        };
        micros.ok_or_else(|| {
            ConversionError::value_conversion("timestamptz", "timestamp out of range")
        })
    }
}

impl From<ArrayRef> for ArrowVector {
    fn from(array: ArrayRef) -> Self {
        Self::new(array)
    }
}

/// Read a dictionary key as an index into the dictionary values.
fn dictionary_key(keys: &dyn Array, row: usize) -> Result<usize> {
    let key = match keys.data_type() {
        DataType::Int8 => usize::try_from(keys.as_primitive::<Int8Type>().value(row)).ok(),
        DataType::Int16 => usize::try_from(keys.as_primitive::<Int16Type>().value(row)).ok(),
        DataType::Int32 => usize::try_from(keys.as_primitive::<Int32Type>().value(row)).ok(),
        DataType::Int64 => usize::try_from(keys.as_primitive::<Int64Type>().value(row)).ok(),
        DataType::UInt8 => Some(usize::from(keys.as_primitive::<UInt8Type>().value(row))),
        DataType::UInt16 => Some(usize::from(keys.as_primitive::<UInt16Type>().value(row))),
        DataType::UInt32 => usize::try_from(keys.as_primitive::<UInt32Type>().value(row)).ok(),
        DataType::UInt64 => usize::try_from(keys.as_primitive::<UInt64Type>().value(row)).ok(),
        _ => None,
    };
    key.ok_or_else(|| ConversionError::value_conversion("enum", "invalid dictionary key"))
}

/// Read a string from any of the Arrow string layouts.
fn string_value(array: &dyn Array, row: usize) -> Result<&str> {
    if row >= array.len() {
        return Err(ConversionError::row_out_of_range(row, array.len()));
    }
    match array.data_type() {
        DataType::Utf8 => Ok(array.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Ok(array.as_string::<i64>().value(row)),
        DataType::Utf8View => Ok(array.as_string_view().value(row)),
        other => Err(ConversionError::value_conversion(
            other.to_string(),
            "expected string values",
        )),
    }
}

impl SourceVector for ArrowVector {
    fn len(&self) -> usize {
        self.array.len()
    }

    fn is_valid(&self, row: usize) -> bool {
        if !self.array.is_valid(row) {
            return false;
        }
        // A valid key may still point at a null dictionary value.
        match self.array.data_type() {
            DataType::Dictionary(..) => {
                let dictionary = self.array.as_any_dictionary();
                dictionary_key(dictionary.keys(), row)
                    .is_ok_and(|key| dictionary.values().is_valid(key))
            }
            _ => true,
        }
    }

    fn child_count(&self) -> usize {
        match self.array.data_type() {
            DataType::Struct(fields) => fields.len(),
            DataType::Union(fields, _) => fields.len(),
            DataType::List(_)
            | DataType::LargeList(_)
            | DataType::FixedSizeList(..)
            | DataType::Map(..) => 1,
            _ => 0,
        }
    }

    fn child(&self, index: usize) -> Result<Self> {
        let missing = || ConversionError::schema_mismatch(index + 1, self.child_count());
        let child: ArrayRef = match self.array.data_type() {
            DataType::Struct(_) => Arc::clone(
                self.array
                    .as_struct()
                    .columns()
                    .get(index)
                    .ok_or_else(missing)?,
            ),
            DataType::List(_) if index == 0 => Arc::clone(self.array.as_list::<i32>().values()),
            DataType::LargeList(_) if index == 0 => {
                Arc::clone(self.array.as_list::<i64>().values())
            }
            DataType::FixedSizeList(..) if index == 0 => {
                Arc::clone(self.array.as_fixed_size_list().values())
            }
            DataType::Map(..) if index == 0 => Arc::new(self.array.as_map().entries().clone()),
            DataType::Union(fields, _) => {
                let (type_id, _) = fields.iter().nth(index).ok_or_else(missing)?;
                Arc::clone(self.array.as_union().child(type_id))
            }
            _ => return Err(missing()),
        };
        Ok(Self::new(child))
    }

    fn list_entry(&self, row: usize) -> Result<ListEntry> {
        self.check_row(row)?;
        let (start, end) = match self.array.data_type() {
            DataType::List(_) => {
                let offsets = self.array.as_list::<i32>().value_offsets();
                (offsets[row] as usize, offsets[row + 1] as usize)
            }
            DataType::LargeList(_) => {
                let offsets = self.array.as_list::<i64>().value_offsets();
                (offsets[row] as usize, offsets[row + 1] as usize)
            }
            DataType::Map(..) => {
                let offsets = self.array.as_map().value_offsets();
                (offsets[row] as usize, offsets[row + 1] as usize)
            }
            DataType::FixedSizeList(..) => {
                let list = self.array.as_fixed_size_list();
                let start = list.value_offset(row) as usize;
                (start, start + list.value_length() as usize)
            }
            _ => return Err(self.layout_error("list entries")),
        };
        Ok(ListEntry {
            offset: start,
            length: end - start,
        })
    }

    fn union_entry(&self, row: usize) -> Result<UnionEntry> {
        self.check_row(row)?;
        let DataType::Union(fields, _) = self.array.data_type() else {
            return Err(self.layout_error("union discriminant"));
        };
        let union = self.array.as_union();
        let type_id = union.type_id(row);
        let member = fields
            .iter()
            .position(|(id, _)| id == type_id)
            .ok_or_else(|| {
                ConversionError::value_conversion("union", format!("unknown type id {type_id}"))
            })?;
        Ok(UnionEntry {
            member,
            row: union.value_offset(row),
        })
    }

    #[allow(clippy::too_many_lines)]
    fn read_scalar(&self, row: usize) -> Result<Scalar<'_>> {
        self.check_row(row)?;
        let array = &self.array;
        Ok(match array.data_type() {
            DataType::Boolean => Scalar::Boolean(array.as_boolean().value(row)),
            DataType::Int8 => Scalar::Int8(array.as_primitive::<Int8Type>().value(row)),
            DataType::Int16 => Scalar::Int16(array.as_primitive::<Int16Type>().value(row)),
            DataType::Int32 => Scalar::Int32(array.as_primitive::<Int32Type>().value(row)),
            DataType::Int64 => Scalar::Int64(array.as_primitive::<Int64Type>().value(row)),
            DataType::UInt8 => Scalar::UInt8(array.as_primitive::<UInt8Type>().value(row)),
            DataType::UInt16 => Scalar::UInt16(array.as_primitive::<UInt16Type>().value(row)),
            DataType::UInt32 => Scalar::UInt32(array.as_primitive::<UInt32Type>().value(row)),
            DataType::UInt64 => Scalar::UInt64(array.as_primitive::<UInt64Type>().value(row)),
            DataType::Float32 => Scalar::Float32(array.as_primitive::<Float32Type>().value(row)),
            DataType::Float64 => Scalar::Float64(array.as_primitive::<Float64Type>().value(row)),
            DataType::Decimal128(..) => {
                Scalar::Decimal(array.as_primitive::<Decimal128Type>().value(row))
            }
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                Scalar::Str(string_value(array.as_ref(), row)?)
            }
            DataType::Binary => Scalar::Bytes(array.as_binary::<i32>().value(row)),
            DataType::LargeBinary => Scalar::Bytes(array.as_binary::<i64>().value(row)),
            DataType::BinaryView => Scalar::Bytes(array.as_binary_view().value(row)),
            DataType::FixedSizeBinary(16) => {
                let bytes = array.as_fixed_size_binary().value(row);
                Scalar::Uuid(bytes.try_into().map_err(|_| {
                    ConversionError::value_conversion("uuid", "expected 16 bytes")
                })?)
            }
            DataType::Date32 => Scalar::Date(array.as_primitive::<Date32Type>().value(row)),
            DataType::Date64 => {
                let millis = array.as_primitive::<Date64Type>().value(row);
                let days = i32::try_from(millis.div_euclid(MILLIS_PER_DAY)).map_err(|_| {
                    ConversionError::value_conversion("date", "date out of range")
                })?;
                Scalar::Date(days)
            }
            DataType::Time32(TimeUnit::Second) => Scalar::Time(
                i64::from(array.as_primitive::<Time32SecondType>().value(row)) * MICROS_PER_SECOND,
            ),
            DataType::Time32(TimeUnit::Millisecond) => Scalar::Time(
                i64::from(array.as_primitive::<Time32MillisecondType>().value(row)) * 1_000,
            ),
            DataType::Time64(TimeUnit::Microsecond) => {
                Scalar::Time(array.as_primitive::<Time64MicrosecondType>().value(row))
            }
            DataType::Time64(TimeUnit::Nanosecond) => Scalar::Time(
                array
                    .as_primitive::<Time64NanosecondType>()
                    .value(row)
                    .div_euclid(1_000),
            ),
            DataType::Timestamp(unit, Some(_)) => {
                Scalar::TimestampTz(self.timestamp_micros(*unit, row)?)
            }
            DataType::Timestamp(TimeUnit::Second, None) => {
                Scalar::Timestamp(array.as_primitive::<TimestampSecondType>().value(row))
            }
            DataType::Timestamp(TimeUnit::Millisecond, None) => {
                Scalar::Timestamp(array.as_primitive::<TimestampMillisecondType>().value(row))
            }
            DataType::Timestamp(TimeUnit::Microsecond, None) => {
                Scalar::Timestamp(array.as_primitive::<TimestampMicrosecondType>().value(row))
            }
            DataType::Timestamp(TimeUnit::Nanosecond, None) => {
                Scalar::Timestamp(array.as_primitive::<TimestampNanosecondType>().value(row))
            }
            DataType::Interval(IntervalUnit::MonthDayNano) => {
                let value: IntervalMonthDayNano =
                    array.as_primitive::<IntervalMonthDayNanoType>().value(row);
                Scalar::Interval {
                    months: value.months,
                    days: value.days,
                    micros: value.nanoseconds.div_euclid(1_000),
                }
            }
            DataType::Dictionary(..) => {
                let dictionary = array.as_any_dictionary();
                let key = dictionary_key(dictionary.keys(), row)?;
                Scalar::Str(string_value(dictionary.values().as_ref(), key)?)
            }
            _ => return Err(self.layout_error("scalar payload")),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Batches
// ═══════════════════════════════════════════════════════════════════════════

/// An Arrow `RecordBatch` viewed as a source batch.
#[derive(Debug, Clone)]
pub struct ArrowBatch {
    batch: RecordBatch,
}

impl ArrowBatch {
    /// Wrap a record batch.
    #[must_use]
    pub const fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Build a batch from a schema and its columns.
    ///
    /// # Errors
    ///
    /// Returns an arrow error if the columns do not match the schema.
    pub fn try_new(schema: SchemaRef, columns: Vec<ArrayRef>) -> Result<Self> {
        Ok(Self::new(RecordBatch::try_new(schema, columns)?))
    }

    /// Returns the wrapped batch.
    #[must_use]
    pub const fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Schema of the batch.
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Type node of column `col`.
    pub fn column_type(&self, col: usize) -> Result<ArrowType> {
        let schema = self.batch.schema_ref();
        schema
            .fields()
            .get(col)
            .map(|field| ArrowType::from_field(field))
            .ok_or_else(|| ConversionError::column_out_of_range(col, schema.fields().len()))
    }
}

impl From<RecordBatch> for ArrowBatch {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

impl SourceBatch for ArrowBatch {
    type Vector = ArrowVector;

    fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    fn column_count(&self) -> usize {
        self.batch.num_columns()
    }

    fn vector(&self, col: usize) -> Result<ArrowVector> {
        if col >= self.batch.num_columns() {
            return Err(ConversionError::column_out_of_range(
                col,
                self.batch.num_columns(),
            ));
        }
        Ok(ArrowVector::new(Arc::clone(self.batch.column(col))))
    }
}
