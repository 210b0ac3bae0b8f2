//! Source type tree to target type id conversion.

use super::resolved::{ResolvedType, Shape};
use crate::catalog::CompoundKey;
use crate::config::ConverterConfig;
use crate::registry::TypeRegistry;
use crate::source::SourceType;
use crate::types::conversion::type_category;
use crate::types::{DecimalSpec, Oid, SourceKind};
use crate::{ConversionError, Result};

/// Converts source type trees into target type ids.
///
/// Compound children are converted first (post-order), then the compound
/// itself is interned through the [`TypeRegistry`] by its structural key.
/// Base kinds resolve through the catalog's base type table.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use duckpg_convert::catalog::InMemoryCatalog;
/// use duckpg_convert::source::LogicalType;
/// use duckpg_convert::types::Oid;
/// use duckpg_convert::{TypeConverter, TypeRegistry};
///
/// let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
/// let converter = TypeConverter::new(&registry);
///
/// assert_eq!(converter.convert(Some("id"), &LogicalType::integer()).unwrap(), Oid::INT4);
///
/// let tags = LogicalType::list(LogicalType::varchar());
/// let oid = converter.convert(Some("tags"), &tags).unwrap();
/// assert!(oid.value() >= Oid::FIRST_NORMAL.value());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeConverter<'r> {
    registry: &'r TypeRegistry,
    config: ConverterConfig,
}

impl<'r> TypeConverter<'r> {
    /// Create a converter with the default configuration.
    #[must_use]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, ConverterConfig::default())
    }

    /// Create a converter with an explicit configuration.
    #[must_use]
    pub const fn with_config(registry: &'r TypeRegistry, config: ConverterConfig) -> Self {
        Self { registry, config }
    }

    /// The registry compound types are interned in.
    #[must_use]
    pub const fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Target type id for `node`.
    ///
    /// `name` is a diagnostic label only and never affects the result.
    ///
    /// # Errors
    ///
    /// Returns an error if any node in the tree has an unsupported kind, a
    /// decimal has an invalid width/scale, the tree is nested deeper than
    /// the configured limit, or the catalog fails a registration.
    pub fn convert<T: SourceType>(&self, name: Option<&str>, node: &T) -> Result<Oid> {
        self.resolve(name, node).map(|resolved| resolved.type_id())
    }

    /// Convert `node` and keep the whole resolved tree.
    ///
    /// # Errors
    ///
    /// Same as [`convert`](Self::convert).
    pub fn resolve<T: SourceType>(&self, name: Option<&str>, node: &T) -> Result<ResolvedType> {
        self.resolve_at(name, node, 0)
    }

    fn resolve_at<T: SourceType>(
        &self,
        name: Option<&str>,
        node: &T,
        depth: usize,
    ) -> Result<ResolvedType> {
        if depth >= self.config.max_depth {
            tracing::warn!(
                limit = self.config.max_depth,
                label = name.unwrap_or_default(),
                "type tree exceeds nesting limit"
            );
            return Err(ConversionError::recursion_limit(self.config.max_depth));
        }

        let kind = node.kind()?;
        let (key, shape) = match kind {
            SourceKind::Map => {
                let key = self.resolve_child(None, &node.map_key_type()?, depth)?;
                let value = self.resolve_child(None, &node.map_value_type()?, depth)?;
                (
                    Some(CompoundKey::map(key.type_id(), value.type_id())),
                    Shape::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                )
            }
            SourceKind::Struct | SourceKind::Union => {
                let count = node.child_count();
                let mut members = Vec::with_capacity(count);
                for i in 0..count {
                    let member_name = node.child_name(i)?;
                    let member = self.resolve_child(Some(&member_name), &node.child_type(i)?, depth)?;
                    members.push(member);
                }
                let pairs = members
                    .iter()
                    .map(|m| (m.name().to_owned(), m.type_id()))
                    .collect();
                if kind == SourceKind::Struct {
                    (Some(CompoundKey::structure(pairs)), Shape::Struct(members))
                } else {
                    (Some(CompoundKey::union(pairs)), Shape::Union(members))
                }
            }
            SourceKind::List | SourceKind::Array => {
                let element = self.resolve_child(None, &node.list_child_type()?, depth)?;
                let size = if kind == SourceKind::Array {
                    node.array_size()
                } else {
                    None
                };
                let key = match size {
                    Some(size) if self.config.distinguish_fixed_size_arrays => {
                        CompoundKey::array(element.type_id(), size)
                    }
                    _ => CompoundKey::list(element.type_id()),
                };
                (
                    Some(key),
                    Shape::List {
                        element: Box::new(element),
                        size,
                    },
                )
            }
            SourceKind::Decimal => {
                let (width, scale) = node.decimal_width_scale()?;
                let spec = DecimalSpec::new(width, scale)?;
                (Some(CompoundKey::decimal(spec)), Shape::Decimal(spec))
            }
            _ => (None, Shape::Scalar),
        };

        let type_id = match &key {
            Some(key) => self.registry.intern(key)?,
            None => self.registry.base_type_id(kind),
        };
        tracing::trace!(
            %kind,
            category = type_category(kind),
            %type_id,
            depth,
            label = name.unwrap_or_default(),
            "resolved type node"
        );

        Ok(ResolvedType::new(
            name.map(str::to_owned),
            kind,
            type_id,
            shape,
        ))
    }

    /// Resolve a child one level deeper. The child handle is a temporary of
    /// the calling statement, so it is released as soon as it is resolved.
    fn resolve_child<T: SourceType>(
        &self,
        name: Option<&str>,
        child: &T,
        depth: usize,
    ) -> Result<ResolvedType> {
        self.resolve_at(name, child, depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::source::LogicalType;

    fn registry() -> TypeRegistry {
        TypeRegistry::new(Arc::new(InMemoryCatalog::new()))
    }

    #[test]
    fn test_base_kinds() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        assert_eq!(converter.convert(None, &LogicalType::boolean()).unwrap(), Oid::BOOL);
        assert_eq!(
            converter
                .convert(None, &LogicalType::scalar(SourceKind::UBigInt))
                .unwrap(),
            Oid::NUMERIC
        );
        assert_eq!(
            converter
                .convert(None, &LogicalType::scalar(SourceKind::Invalid))
                .unwrap(),
            Oid::INVALID
        );
        assert_eq!(registry.stats().registrations, 0);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let err = converter
            .convert(Some("x"), &LogicalType::from_type_id(200))
            .unwrap_err();
        assert!(err.is_unsupported_type());
    }

    #[test]
    fn test_label_does_not_affect_lists() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let ty = LogicalType::list(LogicalType::integer());
        let a = converter.convert(Some("a"), &ty).unwrap();
        let b = converter.convert(Some("b"), &ty).unwrap();
        let none = converter.convert(None, &ty).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, none);
        assert_eq!(registry.stats().registrations, 1);
    }

    #[test]
    fn test_struct_member_names_matter() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let x = LogicalType::structure([("x", LogicalType::integer())]);
        let y = LogicalType::structure([("y", LogicalType::integer())]);
        assert_ne!(
            converter.convert(None, &x).unwrap(),
            converter.convert(None, &y).unwrap()
        );
    }

    #[test]
    fn test_empty_struct_interned() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let empty = LogicalType::structure(Vec::<(String, LogicalType)>::new());
        let first = converter.convert(None, &empty).unwrap();
        assert_eq!(converter.convert(None, &empty).unwrap(), first);
        assert_eq!(registry.stats().registrations, 1);
    }

    #[test]
    fn test_decimal_scale_matters() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let a = converter.convert(None, &LogicalType::decimal(10, 2)).unwrap();
        let b = converter.convert(None, &LogicalType::decimal(10, 3)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_decimal() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let err = converter.convert(None, &LogicalType::decimal(5, 6)).unwrap_err();
        assert!(err.is_invalid_decimal());
        assert_eq!(registry.stats().registrations, 0);
    }

    #[test]
    fn test_array_shares_list_type_by_default() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let list = converter
            .convert(None, &LogicalType::list(LogicalType::integer()))
            .unwrap();
        let array = converter
            .convert(None, &LogicalType::array(LogicalType::integer(), 3))
            .unwrap();
        assert_eq!(list, array);
    }

    #[test]
    fn test_distinct_arrays() {
        let registry = registry();
        let config = ConverterConfig::default().with_distinct_arrays(true);
        let converter = TypeConverter::with_config(&registry, config);
        let list = converter
            .convert(None, &LogicalType::list(LogicalType::integer()))
            .unwrap();
        let three = converter
            .convert(None, &LogicalType::array(LogicalType::integer(), 3))
            .unwrap();
        let four = converter
            .convert(None, &LogicalType::array(LogicalType::integer(), 4))
            .unwrap();
        assert_ne!(list, three);
        assert_ne!(three, four);
    }

    #[test]
    fn test_nested_map_resolves_children_first() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let ty = LogicalType::map(
            LogicalType::varchar(),
            LogicalType::list(LogicalType::double()),
        );
        let resolved = converter.resolve(Some("m"), &ty).unwrap();
        let Shape::Map { key, value } = resolved.shape() else {
            panic!("expected map shape");
        };
        assert_eq!(key.type_id(), Oid::TEXT);
        // The list was registered before the map that contains it.
        assert!(value.type_id().value() < resolved.type_id().value());
        assert_eq!(resolved.to_string(), "MAP(VARCHAR, LIST(DOUBLE))");
    }

    #[test]
    fn test_recursion_limit() {
        let registry = registry();
        let config = ConverterConfig::default().with_max_depth(3);
        let converter = TypeConverter::with_config(&registry, config);

        let ok = LogicalType::list(LogicalType::list(LogicalType::integer()));
        assert!(converter.convert(None, &ok).is_ok());

        let deep = LogicalType::list(ok);
        let err = converter.convert(None, &deep).unwrap_err();
        assert!(err.is_recursion_limit());
    }

    #[test]
    fn test_union_members() {
        let registry = registry();
        let converter = TypeConverter::new(&registry);
        let ty = LogicalType::union([("n", LogicalType::integer()), ("s", LogicalType::varchar())]);
        let resolved = converter.resolve(None, &ty).unwrap();
        assert_eq!(resolved.kind(), SourceKind::Union);
        assert_eq!(resolved.to_string(), "UNION(n INTEGER, s VARCHAR)");
        let as_struct = LogicalType::structure([
            ("n", LogicalType::integer()),
            ("s", LogicalType::varchar()),
        ]);
        assert_ne!(converter.convert(None, &as_struct).unwrap(), resolved.type_id());
    }
}
