//! Converter configuration.
//!
//! Settings can be built in code with the `with_*` setters or loaded from a
//! TOML file:
//!
//! ```toml
//! max_depth = 32
//! distinguish_fixed_size_arrays = true
//! row_limit = 10000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{ConversionError, Result};

/// Default limit on type tree nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for type conversion and value extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Deepest type tree accepted.
    ///
    /// A tree nested deeper than this fails with a recursion limit error.
    /// Default: 64.
    pub max_depth: usize,

    /// Whether fixed-size arrays get their own interned type per size.
    ///
    /// When false, `INTEGER[3]` and `INTEGER[]` share one type id.
    /// Default: false.
    pub distinguish_fixed_size_arrays: bool,

    /// Maximum number of rows materialized per batch.
    ///
    /// `None` materializes every row. Default: `None`.
    pub row_limit: Option<usize>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            distinguish_fixed_size_arrays: false,
            row_limit: None,
        }
    }
}

impl ConverterConfig {
    /// Set the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = if max_depth == 0 { 1 } else { max_depth };
        self
    }

    /// Give fixed-size arrays their own interned type per size.
    #[must_use]
    pub const fn with_distinct_arrays(mut self, distinguish: bool) -> Self {
        self.distinguish_fixed_size_arrays = distinguish;
        self
    }

    /// Cap the number of rows materialized per batch.
    #[must_use]
    pub const fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Parse a configuration from TOML text.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a config error on malformed TOML, unknown keys, or a zero
    /// `max_depth`.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConversionError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConversionError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        tracing::debug!(path = %path.display(), "loading converter config");
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ConversionError::config("max_depth must be at least 1"));
        }
        Ok(())
    }
}
