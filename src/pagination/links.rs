use url::Url;

use super::response::PaginationLinks;
use super::window::{DEFAULT_PAGE_NUMBER, PageWindow};
use crate::errors::PaginationError;

/// Absolute link template for one request.
///
/// Holds the request's `scheme://host/path` and its query pairs in their
/// original order. Only the page keys are rewritten when a link is produced;
/// every other pair (filters, search, sort, includes) is carried over untouched.
#[derive(Debug, Clone)]
pub struct PageLinks {
    base: Url,
    pairs: Vec<(String, String)>,
    size_key: String,
    number_key: String,
}

impl PageLinks {
    /// # Errors
    /// Returns [`PaginationError::InvalidBaseUrl`] when `scheme://host/path` is not a valid URL.
    pub fn new(
        scheme: &str,
        host: &str,
        path: &str,
        query: Option<&str>,
        size_key: impl Into<String>,
        number_key: impl Into<String>,
    ) -> Result<Self, PaginationError> {
        let raw = format!("{scheme}://{host}{path}");
        let mut base = Url::parse(&raw).map_err(|source| PaginationError::InvalidBaseUrl {
            url: raw.clone(),
            source,
        })?;
        base.set_query(None);
        base.set_fragment(None);

        let pairs = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            base,
            pairs,
            size_key: size_key.into(),
            number_key: number_key.into(),
        })
    }

    /// Replace scheme and host with those of `origin`, keeping path and query.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidBaseUrl`] when `origin` does not parse.
    pub fn with_origin(mut self, origin: &str) -> Result<Self, PaginationError> {
        let origin_url = Url::parse(origin).map_err(|source| PaginationError::InvalidBaseUrl {
            url: origin.to_string(),
            source,
        })?;
        let mut base = origin_url;
        base.set_path(self.base.path());
        base.set_query(None);
        base.set_fragment(None);
        self.base = base;
        Ok(self)
    }

    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The request URL with the page keys set to `number` and `size`.
    #[must_use]
    pub fn url_for(&self, number: u64, size: u64) -> String {
        let number = number.to_string();
        let size = size.to_string();

        let mut pairs = self.pairs.clone();
        let mut size_seen = false;
        let mut number_seen = false;
        pairs.retain_mut(|(key, value)| {
            if *key == self.size_key {
                if size_seen {
                    return false;
                }
                size_seen = true;
                value.clone_from(&size);
            } else if *key == self.number_key {
                if number_seen {
                    return false;
                }
                number_seen = true;
                value.clone_from(&number);
            }
            true
        });
        if !size_seen {
            pairs.push((self.size_key.clone(), size));
        }
        if !number_seen {
            pairs.push((self.number_key.clone(), number));
        }

        let mut url = self.base.clone();
        url.query_pairs_mut().clear().extend_pairs(&pairs);
        url.into()
    }

    /// first/last always, next/prev only when that page exists.
    #[must_use]
    pub fn links(&self, window: &PageWindow) -> PaginationLinks {
        PaginationLinks {
            first: self.url_for(DEFAULT_PAGE_NUMBER, window.size),
            last: self.url_for(window.last_page, window.size),
            next: window
                .has_next()
                .then(|| self.url_for(window.number + 1, window.size)),
            prev: window
                .has_prev()
                .then(|| self.url_for(window.number - 1, window.size)),
        }
    }
}
