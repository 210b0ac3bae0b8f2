//! Resolved type trees.
//!
//! A [`ResolvedType`] is a source type tree after conversion: every node
//! carries its kind, its target type id and its resolved children. The
//! extractor walks this tree in lock-step with the batch vectors, so both
//! sides agree on child order and member names.

use std::fmt::{self, Write};

use crate::types::{DecimalSpec, Oid, SourceKind};

/// Kind-specific part of a resolved node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Base kind with no children.
    Scalar,
    /// Decimal with validated width and scale.
    Decimal(DecimalSpec),
    /// List, or fixed-size array when `size` is set.
    List {
        /// Element type
        element: Box<ResolvedType>,
        /// Fixed element count of an array
        size: Option<usize>,
    },
    /// Key/value map.
    Map {
        /// Key type
        key: Box<ResolvedType>,
        /// Value type
        value: Box<ResolvedType>,
    },
    /// Struct members in declaration order; each member is labelled with its name.
    Struct(Vec<ResolvedType>),
    /// Union members in declaration order; each member is labelled with its name.
    Union(Vec<ResolvedType>),
}

/// A converted type tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    label: Option<String>,
    kind: SourceKind,
    type_id: Oid,
    shape: Shape,
}

impl ResolvedType {
    pub(crate) const fn new(
        label: Option<String>,
        kind: SourceKind,
        type_id: Oid,
        shape: Shape,
    ) -> Self {
        Self {
            label,
            kind,
            type_id,
            shape,
        }
    }

    /// Column or member name this node was resolved under, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Member name, empty when unnamed.
    #[must_use]
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    /// Source kind.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Target type id.
    #[must_use]
    pub const fn type_id(&self) -> Oid {
        self.type_id
    }

    /// Kind-specific detail and children.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Decimal width and scale, for decimal nodes.
    #[must_use]
    pub const fn decimal(&self) -> Option<DecimalSpec> {
        match self.shape {
            Shape::Decimal(spec) => Some(spec),
            _ => None,
        }
    }

    /// Direct children in traversal order.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match &self.shape {
            Shape::Scalar | Shape::Decimal(_) => Vec::new(),
            Shape::List { element, .. } => vec![element.as_ref()],
            Shape::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            Shape::Struct(members) | Shape::Union(members) => members.iter().collect(),
        }
    }

    /// Render the tree with target ids, one node per line.
    ///
    /// ```text
    /// row: STRUCT -> 16385
    ///   a: INTEGER -> 23
    ///   b: LIST -> 16384
    ///     VARCHAR -> 25
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => {
                let _ = writeln!(out, "{indent}{label}: {} -> {}", self.head(), self.type_id);
            }
            _ => {
                let _ = writeln!(out, "{indent}{} -> {}", self.head(), self.type_id);
            }
        }
        for child in self.children() {
            child.describe_into(out, depth + 1);
        }
    }

    fn head(&self) -> String {
        match &self.shape {
            Shape::Decimal(spec) => spec.to_string(),
            Shape::List {
                size: Some(size), ..
            } => format!("{}[{size}]", self.kind),
            _ => self.kind.to_string(),
        }
    }
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[ResolvedType]) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if member.name().is_empty() {
            write!(f, "{member}")?;
        } else {
            write!(f, "{} {member}", member.name())?;
        }
    }
    Ok(())
}

/// SQL-like rendering, e.g. `STRUCT(a INTEGER, b LIST(VARCHAR))`.
impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::Scalar => write!(f, "{}", self.kind),
            Shape::Decimal(spec) => write!(f, "{spec}"),
            Shape::List {
                element,
                size: Some(size),
            } => write!(f, "{element}[{size}]"),
            Shape::List { element, .. } => write!(f, "LIST({element})"),
            Shape::Map { key, value } => write!(f, "MAP({key}, {value})"),
            Shape::Struct(members) => {
                f.write_str("STRUCT(")?;
                write_members(f, members)?;
                f.write_str(")")
            }
            Shape::Union(members) => {
                f.write_str("UNION(")?;
                write_members(f, members)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(label: Option<&str>, kind: SourceKind, oid: Oid) -> ResolvedType {
        ResolvedType::new(label.map(str::to_owned), kind, oid, Shape::Scalar)
    }

    fn sample() -> ResolvedType {
        let list = ResolvedType::new(
            Some("b".into()),
            SourceKind::List,
            Oid::new(16384),
            Shape::List {
                element: Box::new(scalar(None, SourceKind::Varchar, Oid::TEXT)),
                size: None,
            },
        );
        ResolvedType::new(
            Some("row".into()),
            SourceKind::Struct,
            Oid::new(16385),
            Shape::Struct(vec![scalar(Some("a"), SourceKind::Integer, Oid::INT4), list]),
        )
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "STRUCT(a INTEGER, b LIST(VARCHAR))");
    }

    #[test]
    fn test_describe() {
        let expected = "row: STRUCT -> 16385\n  a: INTEGER -> 23\n  b: LIST -> 16384\n    VARCHAR -> 25\n";
        assert_eq!(sample().describe(), expected);
    }

    #[test]
    fn test_children_order() {
        let ty = sample();
        let names: Vec<_> = ty.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(ty.children()[0].children().is_empty());
    }

    #[test]
    fn test_array_and_decimal_rendering() {
        let spec = DecimalSpec::new(12, 4).unwrap();
        let decimal = ResolvedType::new(None, SourceKind::Decimal, Oid::new(16400), Shape::Decimal(spec));
        assert_eq!(decimal.decimal(), Some(spec));
        let array = ResolvedType::new(
            None,
            SourceKind::Array,
            Oid::new(16401),
            Shape::List {
                element: Box::new(decimal),
                size: Some(3),
            },
        );
        assert_eq!(array.to_string(), "DECIMAL(12,4)[3]");
        assert_eq!(array.describe(), "ARRAY[3] -> 16401\n  DECIMAL(12,4) -> 16400\n");
    }
}
