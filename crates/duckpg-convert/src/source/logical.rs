//! Owned in-memory logical type tree.
//!
//! Mirrors the source engine's logical type objects: every node carries the
//! engine's raw type tag plus kind-specific detail. Useful when the caller
//! already has a type description and no Arrow schema, and as the reference
//! [`SourceType`] implementation.

use std::fmt;

use super::SourceType;
use crate::types::SourceKind;
use crate::{ConversionError, Result};

/// A node of the source engine's logical type tree.
///
/// # Example
///
/// ```rust
/// use duckpg_convert::source::LogicalType;
///
/// // STRUCT(a INTEGER, b VARCHAR[])
/// let ty = LogicalType::structure([
///     ("a", LogicalType::integer()),
///     ("b", LogicalType::list(LogicalType::varchar())),
/// ]);
/// assert_eq!(ty.to_string(), "STRUCT(a INTEGER, b LIST(VARCHAR))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalType {
    type_id: u32,
    detail: Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Detail {
    None,
    Decimal { width: u8, scale: u8 },
    List(Box<LogicalType>),
    Array(Box<LogicalType>, usize),
    Map(Box<LogicalType>, Box<LogicalType>),
    Members(Vec<(String, LogicalType)>),
}

impl LogicalType {
    /// A scalar node of the given kind.
    ///
    /// Compound kinds built this way have no children; use the dedicated
    /// constructors for them.
    #[must_use]
    pub const fn scalar(kind: SourceKind) -> Self {
        Self {
            type_id: kind.type_id(),
            detail: Detail::None,
        }
    }

    /// A node carrying an arbitrary raw tag, which need not be a known kind.
    #[must_use]
    pub const fn from_type_id(type_id: u32) -> Self {
        Self {
            type_id,
            detail: Detail::None,
        }
    }

    /// `BOOLEAN`.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::scalar(SourceKind::Boolean)
    }

    /// `INTEGER`.
    #[must_use]
    pub const fn integer() -> Self {
        Self::scalar(SourceKind::Integer)
    }

    /// `BIGINT`.
    #[must_use]
    pub const fn bigint() -> Self {
        Self::scalar(SourceKind::BigInt)
    }

    /// `DOUBLE`.
    #[must_use]
    pub const fn double() -> Self {
        Self::scalar(SourceKind::Double)
    }

    /// `VARCHAR`.
    #[must_use]
    pub const fn varchar() -> Self {
        Self::scalar(SourceKind::Varchar)
    }

    /// `DECIMAL(width, scale)`.
    #[must_use]
    pub const fn decimal(width: u8, scale: u8) -> Self {
        Self {
            type_id: SourceKind::Decimal.type_id(),
            detail: Detail::Decimal { width, scale },
        }
    }

    /// `LIST(element)`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self {
            type_id: SourceKind::List.type_id(),
            detail: Detail::List(Box::new(element)),
        }
    }

    /// `element[size]`, a fixed-size list.
    #[must_use]
    pub fn array(element: Self, size: usize) -> Self {
        Self {
            type_id: SourceKind::Array.type_id(),
            detail: Detail::Array(Box::new(element), size),
        }
    }

    /// `MAP(key, value)`.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self {
            type_id: SourceKind::Map.type_id(),
            detail: Detail::Map(Box::new(key), Box::new(value)),
        }
    }

    /// `STRUCT(name type, ...)`; names may be empty.
    #[must_use]
    pub fn structure<N: Into<String>>(members: impl IntoIterator<Item = (N, Self)>) -> Self {
        Self {
            type_id: SourceKind::Struct.type_id(),
            detail: Detail::Members(members.into_iter().map(|(n, t)| (n.into(), t)).collect()),
        }
    }

    /// `UNION(name type, ...)`.
    #[must_use]
    pub fn union<N: Into<String>>(members: impl IntoIterator<Item = (N, Self)>) -> Self {
        Self {
            type_id: SourceKind::Union.type_id(),
            detail: Detail::Members(members.into_iter().map(|(n, t)| (n.into(), t)).collect()),
        }
    }

    /// Raw tag of this node.
    #[must_use]
    pub const fn type_id(&self) -> u32 {
        self.type_id
    }

    fn members(&self) -> &[(String, Self)] {
        match &self.detail {
            Detail::Members(members) => members,
            _ => &[],
        }
    }

    fn member(&self, index: usize) -> Result<&(String, Self)> {
        self.members()
            .get(index)
            .ok_or_else(|| ConversionError::schema_mismatch(index + 1, self.members().len()))
    }

    fn wrong_kind(&self, wanted: &str) -> ConversionError {
        ConversionError::value_conversion(
            crate::types::type_name(self.type_id),
            format!("type has no {wanted}"),
        )
    }
}

impl SourceType for LogicalType {
    fn kind(&self) -> Result<SourceKind> {
        SourceKind::try_from(self.type_id)
    }

    fn child_count(&self) -> usize {
        self.members().len()
    }

    fn child_name(&self, index: usize) -> Result<String> {
        self.member(index).map(|(name, _)| name.clone())
    }

    fn child_type(&self, index: usize) -> Result<Self> {
        self.member(index).map(|(_, ty)| ty.clone())
    }

    fn list_child_type(&self) -> Result<Self> {
        match &self.detail {
            Detail::List(element) | Detail::Array(element, _) => Ok((**element).clone()),
            _ => Err(self.wrong_kind("element type")),
        }
    }

    fn map_key_type(&self) -> Result<Self> {
        match &self.detail {
            Detail::Map(key, _) => Ok((**key).clone()),
            _ => Err(self.wrong_kind("key type")),
        }
    }

    fn map_value_type(&self) -> Result<Self> {
        match &self.detail {
            Detail::Map(_, value) => Ok((**value).clone()),
            _ => Err(self.wrong_kind("value type")),
        }
    }

    fn decimal_width_scale(&self) -> Result<(u8, u8)> {
        match self.detail {
            Detail::Decimal { width, scale } => Ok((width, scale)),
            _ => Err(self.wrong_kind("width/scale")),
        }
    }

    fn array_size(&self) -> Option<usize> {
        match self.detail {
            Detail::Array(_, size) => Some(size),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = crate::types::type_name(self.type_id);
        match &self.detail {
            Detail::None => f.write_str(name),
            Detail::Decimal { width, scale } => write!(f, "DECIMAL({width},{scale})"),
            Detail::List(element) => write!(f, "LIST({element})"),
            Detail::Array(element, size) => write!(f, "{element}[{size}]"),
            Detail::Map(key, value) => write!(f, "MAP({key}, {value})"),
            Detail::Members(members) => {
                write!(f, "{name}(")?;
                for (i, (member, ty)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if member.is_empty() {
                        write!(f, "{ty}")?;
                    } else {
                        write!(f, "{member} {ty}")?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}
