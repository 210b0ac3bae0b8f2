//! Source engine collaborator interfaces.
//!
//! The converter and extractor only ever see the source engine through these
//! traits:
//!
//! - [`SourceType`] - a handle to one node of the logical type tree
//! - [`SourceBatch`] / [`SourceVector`] - a columnar result chunk
//!
//! Child accessors on [`SourceType`] hand out *owned* handles. A handle is
//! released when it is dropped, so every fetched child is released exactly
//! once on every path out of the caller, `?` included.
//!
//! Two implementations ship with the crate: [`arrow`] adapts Arrow arrays
//! (the source engine's export format) and [`logical`] is a plain owned type
//! tree for callers that describe types directly.

pub mod arrow;
pub mod logical;

pub use self::arrow::{ArrowBatch, ArrowType, ArrowVector};
pub use logical::LogicalType;

use crate::Result;
use crate::types::SourceKind;

/// Handle to a node in the source type tree.
///
/// Implementations must return a fresh handle from every child accessor,
/// even when asked repeatedly for the same logical child.
pub trait SourceType: Sized {
    /// Kind of this node.
    ///
    /// # Errors
    ///
    /// Returns an unsupported type error if the node's kind is outside
    /// [`SourceKind`].
    fn kind(&self) -> Result<SourceKind>;

    /// Number of struct members or union members.
    ///
    /// Zero for every other kind.
    fn child_count(&self) -> usize;

    /// Name of struct/union member `index`, empty when unnamed.
    fn child_name(&self, index: usize) -> Result<String>;

    /// Type of struct/union member `index`.
    fn child_type(&self, index: usize) -> Result<Self>;

    /// Element type of a list or array.
    fn list_child_type(&self) -> Result<Self>;

    /// Key type of a map.
    fn map_key_type(&self) -> Result<Self>;

    /// Value type of a map.
    fn map_value_type(&self) -> Result<Self>;

    /// Width and scale of a decimal.
    fn decimal_width_scale(&self) -> Result<(u8, u8)>;

    /// Fixed element count of an array, `None` for every other kind.
    fn array_size(&self) -> Option<usize>;
}

/// A columnar batch of rows.
pub trait SourceBatch {
    /// Vector type handed out per column.
    type Vector: SourceVector;

    /// Number of rows in the batch.
    fn row_count(&self) -> usize;

    /// Number of top-level columns.
    fn column_count(&self) -> usize;

    /// Vector for column `col`.
    fn vector(&self, col: usize) -> Result<Self::Vector>;
}

/// One column (or nested child) of a batch.
///
/// Child layout per kind:
///
/// | Kind | `child(i)` | Row addressing |
/// |------|------------|----------------|
/// | struct | member `i` | same row |
/// | list, array | `0`: elements | [`list_entry`](Self::list_entry) |
/// | map | `0`: entries struct, whose children are `0` keys and `1` values | [`list_entry`](Self::list_entry) |
/// | union | member `i` | [`union_entry`](Self::union_entry) |
pub trait SourceVector: Sized {
    /// Number of rows in this vector.
    fn len(&self) -> usize;

    /// Returns true if the vector holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns false when `row` is null.
    fn is_valid(&self, row: usize) -> bool;

    /// Child vector `index`.
    fn child(&self, index: usize) -> Result<Self>;

    /// Number of child vectors.
    fn child_count(&self) -> usize;

    /// Range of element rows for a list, array, or map row.
    fn list_entry(&self, row: usize) -> Result<ListEntry>;

    /// Active member of a union row and the member's row.
    fn union_entry(&self, row: usize) -> Result<UnionEntry>;

    /// Raw scalar payload at `row`.
    fn read_scalar(&self, row: usize) -> Result<Scalar<'_>>;
}

/// Offset and length of one list row inside its element vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEntry {
    /// First element row.
    pub offset: usize,
    /// Number of elements.
    pub length: usize,
}

impl ListEntry {
    /// Element rows covered by this entry.
    #[must_use]
    pub const fn rows(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Discriminant of one union row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionEntry {
    /// Index of the active member.
    pub member: usize,
    /// Row inside the member's vector.
    pub row: usize,
}

/// Raw payload of one scalar slot.
///
/// Temporal values use the source engine's epoch (1970-01-01). Timestamps
/// carry the raw count in the unit of the node's kind: seconds for
/// `TIMESTAMP_S`, milliseconds for `TIMESTAMP_MS`, nanoseconds for
/// `TIMESTAMP_NS`, microseconds otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum Scalar<'a> {
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int128(i128),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    UInt128(u128),
    Float32(f32),
    Float64(f64),
    /// Unscaled decimal; the scale comes from the type.
    Decimal(i128),
    Str(&'a str),
    Bytes(&'a [u8]),
    /// Days since the Unix epoch.
    Date(i32),
    /// Microseconds since midnight.
    Time(i64),
    /// Microseconds since midnight plus UTC offset in seconds.
    TimeTz { micros: i64, offset_seconds: i32 },
    Timestamp(i64),
    /// Microseconds since the Unix epoch, UTC.
    TimestampTz(i64),
    Interval { months: i32, days: i32, micros: i64 },
    Uuid([u8; 16]),
}

impl Scalar<'_> {
    /// Short name of the payload variant, for error messages.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Int8(_) => "int8",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Int128(_) => "int128",
            Self::UInt8(_) => "uint8",
            Self::UInt16(_) => "uint16",
            Self::UInt32(_) => "uint32",
            Self::UInt64(_) => "uint64",
            Self::UInt128(_) => "uint128",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Decimal(_) => "decimal",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::TimeTz { .. } => "timetz",
            Self::Timestamp(_) => "timestamp",
            Self::TimestampTz(_) => "timestamptz",
            Self::Interval { .. } => "interval",
            Self::Uuid(_) => "uuid",
        }
    }
}
