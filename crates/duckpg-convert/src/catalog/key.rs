//! Structural interning keys for anonymous compound types.

use std::fmt;

use crate::types::{DecimalSpec, Oid};

/// Category of an anonymous compound type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundCategory {
    /// Key/value map
    Map,
    /// Variable-length list
    List,
    /// Fixed-size array
    Array,
    /// Named record
    Struct,
    /// Tagged union
    Union,
    /// Fixed-point decimal with fixed width and scale
    Decimal,
}

impl CompoundCategory {
    /// Short lowercase name, used in generated type names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::List => "list",
            Self::Array => "array",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Decimal => "decimal",
        }
    }
}

impl fmt::Display for CompoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural identity of an anonymous compound type.
///
/// Two keys are equal exactly when the types they describe have the same
/// shape: same category, same child type ids in the same order, and for
/// structs and unions the same member names. Column labels never take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompoundKey {
    /// `MAP(key, value)`
    Map {
        /// Key type id
        key: Oid,
        /// Value type id
        value: Oid,
    },
    /// `LIST(element)`, also used for arrays unless sizes are distinguished
    List {
        /// Element type id
        element: Oid,
    },
    /// `element[size]`
    Array {
        /// Element type id
        element: Oid,
        /// Fixed element count
        size: usize,
    },
    /// `STRUCT(name oid, ...)`
    Struct {
        /// Member names and type ids in declaration order
        fields: Vec<(String, Oid)>,
    },
    /// `UNION(name oid, ...)`
    Union {
        /// Member names and type ids in declaration order
        members: Vec<(String, Oid)>,
    },
    /// `DECIMAL(width, scale)`
    Decimal {
        /// Total digits
        width: u8,
        /// Digits after the point
        scale: u8,
    },
}

impl CompoundKey {
    /// Key for a map type.
    #[must_use]
    pub const fn map(key: Oid, value: Oid) -> Self {
        Self::Map { key, value }
    }

    /// Key for a list type.
    #[must_use]
    pub const fn list(element: Oid) -> Self {
        Self::List { element }
    }

    /// Key for a fixed-size array type.
    #[must_use]
    pub const fn array(element: Oid, size: usize) -> Self {
        Self::Array { element, size }
    }

    /// Key for a struct type.
    #[must_use]
    pub const fn structure(fields: Vec<(String, Oid)>) -> Self {
        Self::Struct { fields }
    }

    /// Key for a union type.
    #[must_use]
    pub const fn union(members: Vec<(String, Oid)>) -> Self {
        Self::Union { members }
    }

    /// Key for a decimal type.
    #[must_use]
    pub const fn decimal(spec: DecimalSpec) -> Self {
        Self::Decimal {
            width: spec.width(),
            scale: spec.scale(),
        }
    }

    /// Category of the described type.
    #[must_use]
    pub const fn category(&self) -> CompoundCategory {
        match self {
            Self::Map { .. } => CompoundCategory::Map,
            Self::List { .. } => CompoundCategory::List,
            Self::Array { .. } => CompoundCategory::Array,
            Self::Struct { .. } => CompoundCategory::Struct,
            Self::Union { .. } => CompoundCategory::Union,
            Self::Decimal { .. } => CompoundCategory::Decimal,
        }
    }

    /// Child type ids referenced by this key, in order.
    #[must_use]
    pub fn child_oids(&self) -> Vec<Oid> {
        match self {
            Self::Map { key, value } => vec![*key, *value],
            Self::List { element } | Self::Array { element, .. } => vec![*element],
            Self::Struct { fields: members } | Self::Union { members } => {
                members.iter().map(|(_, oid)| *oid).collect()
            }
            Self::Decimal { .. } => Vec::new(),
        }
    }
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[(String, Oid)]) -> fmt::Result {
    for (i, (name, oid)) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{name}={oid}")?;
    }
    Ok(())
}

/// Compact canonical form, e.g. `struct(a=23,b=16385)`.
impl fmt::Display for CompoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.category())?;
        match self {
            Self::Map { key, value } => write!(f, "{key},{value}")?,
            Self::List { element } => write!(f, "{element}")?,
            Self::Array { element, size } => write!(f, "{element};{size}")?,
            Self::Struct { fields: members } | Self::Union { members } => {
                write_members(f, members)?;
            }
            Self::Decimal { width, scale } => write!(f, "{width},{scale}")?,
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_as_str() {
        assert_eq!(CompoundCategory::Map.as_str(), "map");
        assert_eq!(CompoundCategory::Decimal.as_str(), "decimal");
    }

    #[test]
    fn test_struct_names_participate() {
        let a = CompoundKey::structure(vec![("a".into(), Oid::INT4)]);
        let b = CompoundKey::structure(vec![("b".into(), Oid::INT4)]);
        assert_ne!(a, b);
        assert_eq!(a, CompoundKey::structure(vec![("a".into(), Oid::INT4)]));
    }

    #[test]
    fn test_member_order_participates() {
        let ab = CompoundKey::union(vec![("a".into(), Oid::INT4), ("b".into(), Oid::TEXT)]);
        let ba = CompoundKey::union(vec![("b".into(), Oid::TEXT), ("a".into(), Oid::INT4)]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_struct_and_union_differ() {
        let members = vec![("x".to_string(), Oid::BOOL)];
        assert_ne!(
            CompoundKey::structure(members.clone()),
            CompoundKey::union(members)
        );
    }

    #[test]
    fn test_display() {
        let key = CompoundKey::structure(vec![
            ("a".into(), Oid::INT4),
            ("b".into(), Oid::new(16385)),
        ]);
        assert_eq!(key.to_string(), "struct(a=23,b=16385)");
        assert_eq!(CompoundKey::array(Oid::INT4, 3).to_string(), "array(23;3)");
        assert_eq!(
            CompoundKey::decimal(DecimalSpec::new(10, 2).unwrap()).to_string(),
            "decimal(10,2)"
        );
    }

    #[test]
    fn test_child_oids() {
        let key = CompoundKey::map(Oid::TEXT, Oid::FLOAT8);
        assert_eq!(key.child_oids(), vec![Oid::TEXT, Oid::FLOAT8]);
        assert!(CompoundKey::decimal(DecimalSpec::new(5, 0).unwrap())
            .child_oids()
            .is_empty());
    }
}
