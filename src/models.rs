use serde::Deserialize;
use serde_with::{NoneAsEmptyString, StringWithSeparator, formats::CommaSeparator, serde_as};
use utoipa::IntoParams;

use crate::config::PaginationConfig;
use crate::errors::PaginationError;
use crate::pagination::PageLinks;

/// Requested page size and number, as sent by the client.
///
/// `None` means the key was absent or empty. Zero and negative values are
/// kept as sent and fall back to the configured defaults when resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationRequest {
    pub size: Option<i64>,
    pub number: Option<i64>,
}

impl PaginationRequest {
    #[must_use]
    pub fn new(size: Option<i64>, number: Option<i64>) -> Self {
        Self { size, number }
    }

    /// Read the page keys named in `config` from a raw query string.
    ///
    /// The first occurrence of each key wins.
    ///
    /// # Errors
    /// Returns [`PaginationError::Bind`] when a page value is present but not an integer.
    pub fn from_query(query: Option<&str>, config: &PaginationConfig) -> Result<Self, PaginationError> {
        let mut request = Self::default();
        let Some(query) = query else {
            return Ok(request);
        };

        let mut size_seen = false;
        let mut number_seen = false;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == config.page_size_key && !size_seen {
                size_seen = true;
                request.size = parse_page_value(&key, &value)?;
            } else if key == config.page_number_key && !number_seen {
                number_seen = true;
                request.number = parse_page_value(&key, &value)?;
            }
        }
        Ok(request)
    }

    /// `(size, number)` after defaults and the `max_page_size` clamp.
    #[must_use]
    pub fn resolve(&self, config: &PaginationConfig) -> (u64, u64) {
        let size = self.size.and_then(|s| u64::try_from(s).ok());
        let number = self.number.and_then(|n| u64::try_from(n).ok());
        (
            config.resolve_page_size(size),
            config.resolve_page_number(number),
        )
    }
}

fn parse_page_value(key: &str, value: &str) -> Result<Option<i64>, PaginationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| PaginationError::bind(key, format!("expected an integer, got '{value}'")))
}

/// Search, sort and include parameters shared by every list endpoint.
///
/// # Searching
/// `search` is matched with a contains pattern against every search field the
/// filter declares, OR-combined.
///
/// # Sorting
/// `sort` names a column and `order` is `asc` or `desc` (default `asc`).
/// Invalid values are ignored and the filter's default sort is used.
///
/// # Includes
/// `includes` is a comma-separated list of relation names, dotted for
/// nesting (`Province,Sport,Event.Venue`). Names the filter does not allow
/// are ignored.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Free-text search term.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(example = "jakarta")]
    pub search: Option<String>,
    /// Column to sort by.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(example = "name")]
    pub sort: Option<String>,
    /// `asc` or `desc`.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(example = "asc")]
    pub order: Option<String>,
    /// Comma-separated relation names to eager-load.
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, String>>")]
    #[param(value_type = Option<String>, example = "Province,Sport")]
    pub includes: Option<Vec<String>>,
}

impl ListParams {
    /// Add includes a handler always wants, keeping the client's first.
    pub fn push_includes<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes
            .get_or_insert_with(Vec::new)
            .extend(names.into_iter().map(Into::into));
    }
}

/// One bound list request: page keys, shared list parameters, the
/// endpoint's typed filter and the link template for the response.
///
/// Handlers may adjust `filter` or `params` before paginating, e.g. to scope
/// a nested route to its parent id or to force includes.
#[derive(Debug, Clone)]
pub struct PageRequest<F> {
    pub pagination: PaginationRequest,
    pub params: ListParams,
    pub filter: F,
    pub links: PageLinks,
}
