//! Runtime settings for pagination.
//!
//! `PaginationConfig` deserializes with every field optional, so a host
//! application can nest it in its own config file:
//!
//! ```toml
//! [pagination]
//! default_page_size = 25
//! max_page_size = 100
//! page_size_key = "page[size]"
//! page_number_key = "page[number]"
//! dialect = "postgres"
//! base_url = "https://api.example.com"
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::filtering::Dialect;
use crate::pagination::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

pub const DEFAULT_PAGE_SIZE_KEY: &str = "page[size]";
pub const DEFAULT_PAGE_NUMBER_KEY: &str = "page[number]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub default_page_number: u64,
    /// Upper bound for a requested page size. `None` means unbounded.
    pub max_page_size: Option<u64>,
    pub page_size_key: String,
    pub page_number_key: String,
    /// Overrides the dialect detected from the database connection.
    pub dialect: Option<Dialect>,
    /// `scheme://host` used for links instead of the request's own.
    pub base_url: Option<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            default_page_number: DEFAULT_PAGE_NUMBER,
            max_page_size: None,
            page_size_key: DEFAULT_PAGE_SIZE_KEY.to_string(),
            page_number_key: DEFAULT_PAGE_NUMBER_KEY.to_string(),
            dialect: None,
            base_url: None,
        }
    }
}

impl PaginationConfig {
    #[must_use]
    pub fn with_default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size;
        self
    }

    #[must_use]
    pub fn with_max_page_size(mut self, max: u64) -> Self {
        self.max_page_size = Some(max);
        self
    }

    #[must_use]
    pub fn with_page_keys(mut self, size_key: impl Into<String>, number_key: impl Into<String>) -> Self {
        self.page_size_key = size_key.into();
        self.page_number_key = number_key.into();
        self
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.default_page_number == 0 {
            return Err(ConfigError::ZeroPageNumber);
        }
        if let Some(max) = self.max_page_size {
            if max < self.default_page_size {
                return Err(ConfigError::MaxBelowDefault {
                    max,
                    default: self.default_page_size,
                });
            }
        }
        if self.page_size_key.is_empty()
            || self.page_number_key.is_empty()
            || self.page_size_key == self.page_number_key
        {
            return Err(ConfigError::InvalidPageKeys);
        }
        Ok(())
    }

    /// Clamp a requested size to `max_page_size`, substituting the default for zero.
    #[must_use]
    pub fn resolve_page_size(&self, requested: Option<u64>) -> u64 {
        let size = requested
            .filter(|&s| s > 0)
            .unwrap_or(self.default_page_size);
        match self.max_page_size {
            Some(max) => size.min(max),
            None => size,
        }
    }

    #[must_use]
    pub fn resolve_page_number(&self, requested: Option<u64>) -> u64 {
        requested
            .filter(|&n| n > 0)
            .unwrap_or(self.default_page_number)
    }
}
