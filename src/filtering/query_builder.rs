use sea_orm::{Condition, EntityTrait, QueryFilter, QueryTrait, Select};

use super::conditions::{Dropped, FilterSet, Predicate};
use super::dialect::Dialect;
use super::includes::IncludeResolver;
use super::search::build_search_predicate;
use super::sort::{SortClause, resolve_sort};
use crate::models::ListParams;

/// Everything one list request asks of the database, before execution.
///
/// The count query and the page query are both built from [`condition`](Self::condition),
/// so `total` always describes the same filtered set the page is cut from.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub dialect: Dialect,
    /// Structured filters first, then the search group (if any). AND-combined.
    pub predicates: Vec<Predicate>,
    pub sort: Vec<SortClause>,
    /// Whitelisted relation names to eager-load, in request order.
    pub includes: Vec<String>,
    /// Request input that failed validation and was left out.
    pub dropped: Vec<Dropped>,
}

impl QueryPlan {
    #[must_use]
    pub fn condition(&self) -> Condition {
        self.predicates
            .iter()
            .fold(Condition::all(), |all, p| all.add(p.to_condition(self.dialect)))
    }

    /// Restrict `select` to the plan's predicates. Used for both count and fetch.
    #[must_use]
    pub fn filtered<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        select.filter(self.condition())
    }

    /// Append the plan's ORDER BY clauses to `select`.
    #[must_use]
    pub fn ordered<E: EntityTrait>(&self, mut select: Select<E>) -> Select<E> {
        for clause in &self.sort {
            if let Some(expr) = clause.expr() {
                QueryTrait::query(&mut select).order_by_expr(expr, clause.direction.order());
            }
        }
        select
    }
}

/// Composes filter predicates, free-text search, sort and includes into a [`QueryPlan`].
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    dialect: Dialect,
    search_fields: Vec<&'a str>,
    sortable_fields: Vec<&'a str>,
    default_sort: &'a str,
    includes: Option<&'a IncludeResolver>,
}

impl<'a> QueryBuilder<'a> {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            search_fields: Vec::new(),
            sortable_fields: Vec::new(),
            default_sort: "",
            includes: None,
        }
    }

    #[must_use]
    pub fn with_search_fields(mut self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        self.search_fields.extend(fields);
        self
    }

    #[must_use]
    pub fn with_sortable_fields(mut self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        self.sortable_fields.extend(fields);
        self
    }

    #[must_use]
    pub fn with_default_sort(mut self, default_sort: &'a str) -> Self {
        self.default_sort = default_sort;
        self
    }

    #[must_use]
    pub fn with_includes(mut self, resolver: &'a IncludeResolver) -> Self {
        self.includes = Some(resolver);
        self
    }

    /// Build the plan. `filters` is the output of the filter's own predicate hook;
    /// search, sort and includes come from the request parameters.
    #[must_use]
    pub fn build(&self, filters: FilterSet, params: &ListParams) -> QueryPlan {
        let (mut predicates, mut dropped) = filters.into_parts();

        if let Some(search) =
            build_search_predicate(params.search.as_deref(), &self.search_fields, &mut dropped)
        {
            predicates.push(search);
        }

        let sort = resolve_sort(
            params.sort.as_deref(),
            params.order.as_deref(),
            &self.sortable_fields,
            self.default_sort,
            &mut dropped,
        );

        let requested = params.includes.as_deref().unwrap_or_default();
        let includes = match self.includes {
            Some(resolver) => {
                let (kept, rejected) = resolver.resolve_with_drops(requested);
                dropped.extend(rejected);
                kept
            }
            None => {
                dropped.extend(requested.iter().map(|name| Dropped {
                    kind: super::conditions::DropKind::Include,
                    value: name.clone(),
                }));
                Vec::new()
            }
        };

        QueryPlan {
            dialect: self.dialect,
            predicates,
            sort,
            includes,
            dropped,
        }
    }
}
