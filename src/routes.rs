use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Query, State},
    http::{HeaderMap, Uri, header, request::Parts},
    routing::{MethodRouter, get},
};
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::config::PaginationConfig;
use crate::core::{FilterSpec, Paginator};
use crate::errors::{ApiError, PaginationError};
use crate::models::{ListParams, PageRequest, PaginationRequest};
use crate::pagination::{PageLinks, PaginatedResponse};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Router state carrying what list handlers need.
#[derive(Clone, Debug)]
pub struct PaginationState {
    pub db: DatabaseConnection,
    pub config: Arc<PaginationConfig>,
}

impl PaginationState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: PaginationConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

impl FromRef<PaginationState> for DatabaseConnection {
    fn from_ref(state: &PaginationState) -> Self {
        state.db.clone()
    }
}

impl FromRef<PaginationState> for Arc<PaginationConfig> {
    fn from_ref(state: &PaginationState) -> Self {
        Arc::clone(&state.config)
    }
}

impl<F: DeserializeOwned> PageRequest<F> {
    /// Bind page keys, list parameters and the typed filter from a request URI.
    ///
    /// # Errors
    /// Returns [`PaginationError::Bind`] when any parameter does not parse, or
    /// [`PaginationError::InvalidBaseUrl`] when no valid link base can be built.
    pub fn bind(uri: &Uri, headers: &HeaderMap, config: &PaginationConfig) -> Result<Self, PaginationError> {
        let pagination = PaginationRequest::from_query(uri.query(), config)?;
        let Query(params) = Query::<ListParams>::try_from_uri(uri)
            .map_err(|rejection| PaginationError::bind("query", rejection.body_text()))?;
        let filter_uri = without_empty_values(uri.query())?;
        let Query(filter) = Query::<F>::try_from_uri(&filter_uri)
            .map_err(|rejection| PaginationError::bind("filter", rejection.body_text()))?;
        let links = request_links(uri, headers, config)?;

        Ok(Self {
            pagination,
            params,
            filter,
            links,
        })
    }
}

/// Re-encode `query` without `key=` pairs, so an empty value leaves a filter
/// field unset instead of failing to parse.
fn without_empty_values(query: Option<&str>) -> Result<Uri, PaginationError> {
    let pairs = form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(_, value)| !value.is_empty());
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("/?{query}")
        .parse()
        .map_err(|_| PaginationError::bind("filter", "query string could not be re-encoded"))
}

/// Link base for a request: `X-Forwarded-Proto`, then the URI scheme, then
/// `http`; the `Host` header, then the URI authority. `base_url` overrides both.
/// Schemes other than `http` and `https` are ignored.
fn request_links(uri: &Uri, headers: &HeaderMap, config: &PaginationConfig) -> Result<PageLinks, PaginationError> {
    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| web_scheme(v.trim()))
        .or_else(|| uri.scheme_str().and_then(web_scheme))
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(axum::http::uri::Authority::as_str))
        .unwrap_or("localhost");

    let links = PageLinks::new(
        scheme,
        host,
        uri.path(),
        uri.query(),
        config.page_size_key.as_str(),
        config.page_number_key.as_str(),
    )?;

    match &config.base_url {
        Some(origin) => links.with_origin(origin),
        None => Ok(links),
    }
}

fn web_scheme(scheme: &str) -> Option<&'static str> {
    if scheme.eq_ignore_ascii_case("https") {
        Some("https")
    } else if scheme.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

impl<S, F> FromRequestParts<S> for PageRequest<F>
where
    F: DeserializeOwned + Send,
    S: Send + Sync,
    Arc<PaginationConfig>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<PaginationConfig>::from_ref(state);
        Ok(Self::bind(&parts.uri, &parts.headers, &config)?)
    }
}

/// Generic list endpoint: binds the request, paginates `F` and returns the envelope.
///
/// # Errors
/// 400 for malformed parameters, 500 for database failures.
pub async fn list_handler<F: FilterSpec>(
    State(db): State<DatabaseConnection>,
    State(config): State<Arc<PaginationConfig>>,
    request: PageRequest<F>,
) -> Result<PaginatedResponse<F::Record>, ApiError> {
    let paginator = Paginator::<F>::new(config)?;
    let page = paginator.paginate(&db, &request).await?;
    let window = page.window;
    Ok(page
        .into_envelope(F::list_message())
        .with_content_range(F::TABLE_NAME, &window))
}

/// `GET` route serving [`list_handler`] for `F`.
pub fn list_route<F, S>() -> MethodRouter<S>
where
    F: FilterSpec,
    S: Clone + Send + Sync + 'static,
    DatabaseConnection: FromRef<S>,
    Arc<PaginationConfig>: FromRef<S>,
{
    get(list_handler::<F>)
}
