//! Errors raised while converting types and extracting values.
//!
//! A single opaque [`ConversionError`] wraps a private kind enum. Callers
//! classify failures through the `is_*` predicates.

use thiserror::Error;

/// Root error type for duckpg-convert crate.
///
/// Captures every failure mode of type conversion and value extraction.
/// All failures are deterministic: the same type tree and batch contents
/// always produce the same error, so nothing here is worth retrying.
///
/// # Example
///
/// ```rust,ignore
/// use duckpg_convert::ConversionError;
///
/// fn handle_error(err: ConversionError) {
///     if err.is_unsupported_type() {
///         eprintln!("source column uses a type with no target mapping");
///     } else if err.is_row_out_of_range() {
///         eprintln!("caller asked for a row past the end of the batch");
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct ConversionError {
    kind: ErrorKind,
}

/// Failure classification, private to the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum ErrorKind {
    /// A source kind outside the closed set of supported kinds.
    #[error("unsupported source type: {kind}")]
    UnsupportedType { kind: String },

    /// Row index past the end of the batch.
    #[error("row {row} out of range: batch has {row_count} rows")]
    RowOutOfRange { row: usize, row_count: usize },

    /// Column index past the last column of the batch.
    #[error("column {column} out of range: batch has {column_count} columns")]
    ColumnOutOfRange { column: usize, column_count: usize },

    /// Vector layout disagrees with the type tree.
    #[error("layout mismatch: type expects {expected} children, vector has {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A scalar payload that does not fit the resolved target type.
    #[error("cannot convert value of '{column}': {message}")]
    ValueConversion { column: String, message: String },

    /// Decimal width/scale outside what the target numeric type accepts.
    #[error("invalid decimal: width {width}, scale {scale}")]
    InvalidDecimal { width: u8, scale: u8 },

    /// Type tree nested deeper than the configured limit.
    #[error("type nesting exceeds limit of {limit} levels")]
    RecursionLimit { limit: usize },

    /// Target catalog refused or failed a registration.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Arrow rejected a batch or array.
    #[error("arrow: {0}")]
    Arrow(arrow_schema::ArrowError),
}

impl ConversionError {
    // ═══════════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════════

    /// Create error for a source kind that has no mapping.
    #[must_use]
    pub fn unsupported_type(kind: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnsupportedType { kind: kind.into() },
        }
    }

    /// Create error for a row index past the end of the batch.
    #[must_use]
    pub const fn row_out_of_range(row: usize, row_count: usize) -> Self {
        Self {
            kind: ErrorKind::RowOutOfRange { row, row_count },
        }
    }

    /// Create error for a column index past the last column.
    #[must_use]
    pub const fn column_out_of_range(column: usize, column_count: usize) -> Self {
        Self {
            kind: ErrorKind::ColumnOutOfRange {
                column,
                column_count,
            },
        }
    }

    /// Create error for a vector whose child count disagrees with its type.
    #[must_use]
    pub const fn schema_mismatch(expected: usize, actual: usize) -> Self {
        Self {
            kind: ErrorKind::SchemaMismatch { expected, actual },
        }
    }

    /// Create error for a payload that does not fit its target type.
    #[must_use]
    pub fn value_conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ValueConversion {
                column: column.into(),
                message: message.into(),
            },
        }
    }

    /// Create error for an invalid decimal width/scale pair.
    #[must_use]
    pub const fn invalid_decimal(width: u8, scale: u8) -> Self {
        Self {
            kind: ErrorKind::InvalidDecimal { width, scale },
        }
    }

    /// Create error for a type tree nested past `limit`.
    #[must_use]
    pub const fn recursion_limit(limit: usize) -> Self {
        Self {
            kind: ErrorKind::RecursionLimit { limit },
        }
    }

    /// Create error for a failed catalog operation.
    #[must_use]
    pub fn catalog(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Catalog(message.into()),
        }
    }

    /// Create error for a configuration problem.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config(message.into()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Classification
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns true if the source kind has no target mapping.
    #[must_use]
    pub const fn is_unsupported_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnsupportedType { .. })
    }

    /// Returns true if this is a row out of range error.
    #[must_use]
    pub const fn is_row_out_of_range(&self) -> bool {
        matches!(self.kind, ErrorKind::RowOutOfRange { .. })
    }

    /// Returns true if this is a column out of range error.
    #[must_use]
    pub const fn is_column_out_of_range(&self) -> bool {
        matches!(self.kind, ErrorKind::ColumnOutOfRange { .. })
    }

    /// Returns true if a vector's layout disagreed with its type.
    #[must_use]
    pub const fn is_schema_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::SchemaMismatch { .. })
    }

    /// Returns true if a payload did not fit its target type.
    #[must_use]
    pub const fn is_value_conversion(&self) -> bool {
        matches!(self.kind, ErrorKind::ValueConversion { .. })
    }

    /// Returns true if this is an invalid decimal error.
    #[must_use]
    pub const fn is_invalid_decimal(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidDecimal { .. })
    }

    /// Returns true if the type tree was nested too deeply.
    #[must_use]
    pub const fn is_recursion_limit(&self) -> bool {
        matches!(self.kind, ErrorKind::RecursionLimit { .. })
    }

    /// Returns true if this is a catalog error.
    #[must_use]
    pub const fn is_catalog_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Catalog(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Config(_))
    }

    /// Returns true if Arrow rejected the input.
    #[must_use]
    pub const fn is_arrow_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Arrow(_))
    }
}

impl From<arrow_schema::ArrowError> for ConversionError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        Self {
            kind: ErrorKind::Arrow(err),
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type() {
        let err = ConversionError::unsupported_type("type id 99");
        assert!(err.is_unsupported_type());
        assert!(!err.is_catalog_error());
        assert_eq!(err.to_string(), "unsupported source type: type id 99");
    }

    #[test]
    fn test_out_of_range_messages() {
        let err = ConversionError::row_out_of_range(10, 4);
        assert!(err.is_row_out_of_range());
        assert!(err.to_string().contains("row 10 out of range"));

        let err = ConversionError::column_out_of_range(3, 2);
        assert!(err.is_column_out_of_range());
        assert!(!err.is_row_out_of_range());
        assert!(err.to_string().contains("2 columns"));
    }

    #[test]
    fn test_layout_mismatch() {
        let err = ConversionError::schema_mismatch(3, 2);
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("expects 3 children, vector has 2"));
    }

    #[test]
    fn test_payload_mismatch_names_column() {
        let err = ConversionError::value_conversion("price", "expected decimal payload");
        assert!(err.is_value_conversion());
        assert!(err.to_string().starts_with("cannot convert value of 'price'"));
    }

    #[test]
    fn test_invalid_decimal() {
        let err = ConversionError::invalid_decimal(40, 2);
        assert!(err.is_invalid_decimal());
        assert!(err.to_string().contains("width 40"));
    }

    #[test]
    fn test_recursion_limit() {
        let err = ConversionError::recursion_limit(64);
        assert!(err.is_recursion_limit());
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_arrow_error_conversion() {
        let err: ConversionError =
            arrow_schema::ArrowError::ComputeError("boom".to_string()).into();
        assert!(err.is_arrow_error());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_catalog_and_config() {
        let err = ConversionError::catalog("duplicate type");
        assert!(err.is_catalog_error());
        assert!(format!("{err:?}").contains("Catalog"));

        let err = ConversionError::config("max_depth must be at least 1");
        assert!(err.is_config_error());
        assert!(!err.is_catalog_error());
    }
}
