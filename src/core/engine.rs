use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, IdenStatic, Iterable, PaginatorTrait,
    QuerySelect,
};
use tracing::debug;

use super::traits::FilterSpec;
use crate::config::PaginationConfig;
use crate::errors::{ConfigError, PaginationError};
use crate::filtering::{
    Dialect, Dropped, FilterSet, IncludeResolver, QueryBuilder, QueryPlan, is_valid_identifier,
    is_valid_relation_path,
};
use crate::models::PageRequest;
use crate::pagination::{PageWindow, PaginatedResponse, PaginationResponse};

/// One executed page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
    pub pagination: PaginationResponse,
    /// Request input left out of the query because it failed validation.
    pub dropped: Vec<Dropped>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn into_envelope(self, message: impl Into<String>) -> PaginatedResponse<T> {
        PaginatedResponse::ok(message, self.items, self.pagination)
    }
}

/// Runs bind → plan → count → window → fetch → includes for one filter type.
///
/// Read-only after [`Paginator::new`] has checked the configuration and the
/// filter's metadata. Construction only runs identifier checks, so
/// [`list_handler`](crate::list_handler) builds one per request from the
/// router's current config; custom handlers may do the same or keep a clone.
pub struct Paginator<F> {
    config: Arc<PaginationConfig>,
    search_fields: Arc<[&'static str]>,
    sortable_fields: Arc<[Cow<'static, str>]>,
    includes: Arc<IncludeResolver>,
    _filter: PhantomData<fn() -> F>,
}

impl<F> Clone for Paginator<F> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            search_fields: Arc::clone(&self.search_fields),
            sortable_fields: Arc::clone(&self.sortable_fields),
            includes: Arc::clone(&self.includes),
            _filter: PhantomData,
        }
    }
}

impl<F> std::fmt::Debug for Paginator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("config", &self.config)
            .field("search_fields", &self.search_fields)
            .field("sortable_fields", &self.sortable_fields)
            .field("includes", &self.includes)
            .finish()
    }
}

impl<F: FilterSpec> Paginator<F> {
    /// # Errors
    /// Returns [`ConfigError`] when the config is inconsistent or the filter
    /// declares a table, search field, sortable field or include that is not a
    /// safe identifier.
    pub fn new(config: impl Into<Arc<PaginationConfig>>) -> Result<Self, ConfigError> {
        let config = config.into();
        config.validate()?;

        if !is_valid_identifier(F::TABLE_NAME) {
            return Err(ConfigError::InvalidTableName(F::TABLE_NAME.to_string()));
        }

        let search_fields = F::search_fields();
        if let Some(bad) = search_fields.iter().find(|f| !is_valid_identifier(f)) {
            return Err(ConfigError::InvalidSearchField((*bad).to_string()));
        }

        let mut sortable_fields: Vec<Cow<'static, str>> =
            F::sortable_fields().into_iter().map(Cow::Borrowed).collect();
        if let Some(bad) = sortable_fields.iter().find(|f| !is_valid_identifier(f)) {
            return Err(ConfigError::InvalidSortableField(bad.to_string()));
        }
        if sortable_fields.is_empty() {
            sortable_fields = entity_columns::<F::Entity>();
        }

        let allowed = F::allowed_includes();
        if let Some(bad) = allowed.iter().find(|i| !is_valid_relation_path(i)) {
            return Err(ConfigError::InvalidInclude((*bad).to_string()));
        }

        Ok(Self {
            config,
            search_fields: search_fields.into(),
            sortable_fields: sortable_fields.into(),
            includes: Arc::new(IncludeResolver::new(allowed)),
            _filter: PhantomData,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Dialect from the config, or detected from the connection.
    #[must_use]
    pub fn dialect_for<C: ConnectionTrait>(&self, db: &C) -> Dialect {
        self.config
            .dialect
            .unwrap_or_else(|| db.get_database_backend().into())
    }

    /// Build the query plan for `request` without touching the database.
    #[must_use]
    pub fn plan(&self, request: &PageRequest<F>, dialect: Dialect) -> QueryPlan {
        let filters = request.filter.apply_filters(FilterSet::new());
        QueryBuilder::new(dialect)
            .with_search_fields(self.search_fields.iter().copied())
            .with_sortable_fields(self.sortable_fields.iter().map(AsRef::as_ref))
            .with_default_sort(F::default_sort())
            .with_includes(&self.includes)
            .build(filters, &request.params)
    }

    /// Count, fetch and load one page.
    ///
    /// Count and fetch share the plan's condition. They are not run in a
    /// transaction, so concurrent writes can make `total` and the page disagree.
    ///
    /// # Errors
    /// Returns the stage that failed: [`PaginationError::Count`],
    /// [`PaginationError::Fetch`] or [`PaginationError::Include`].
    pub async fn paginate(
        &self,
        db: &DatabaseConnection,
        request: &PageRequest<F>,
    ) -> Result<Page<F::Record>, PaginationError> {
        let plan = self.plan(request, self.dialect_for(db));
        log_dropped(F::TABLE_NAME, &plan.dropped);

        let select = plan.filtered(F::Entity::find());
        let total = PaginatorTrait::count(select.clone(), db)
            .await
            .map_err(PaginationError::Count)?;

        let (size, number) = request.pagination.resolve(&self.config);
        let window = PageWindow::new(size, number, total);

        let models = if window.is_empty() {
            Vec::new()
        } else {
            plan.ordered(select)
                .offset(window.offset)
                .limit(window.limit)
                .all(db)
                .await
                .map_err(PaginationError::Fetch)?
        };

        let items = F::load_includes(db, models, &plan.includes)
            .await
            .map_err(PaginationError::Include)?;

        debug!(
            table = F::TABLE_NAME,
            page = window.number,
            size = window.size,
            total,
            returned = items.len(),
            includes = ?plan.includes,
            "Paginated query executed"
        );

        Ok(Page {
            items,
            window,
            pagination: PaginationResponse::new(&window, &request.links),
            dropped: plan.dropped,
        })
    }
}

/// Column names of `E`, used as the sort whitelist when a filter declares none.
fn entity_columns<E: EntityTrait>() -> Vec<Cow<'static, str>> {
    E::Column::iter().map(|column| Cow::Owned(column.as_str().to_owned())).collect()
}

fn log_dropped(table: &str, dropped: &[Dropped]) {
    for entry in dropped {
        debug!(
            table,
            kind = ?entry.kind,
            value = %entry.value,
            "Ignoring invalid list parameter"
        );
    }
}
